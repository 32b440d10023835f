//! Macros for ergonomic application construction.

/// Build a `Vec<TransitionSpec>` from a mix of 2- and 3-tuples.
///
/// `(source, target)` is unconditional; `(source, target, condition)` is
/// guarded. Order is preserved, so earlier entries win for the same source.
///
/// # Example
///
/// ```
/// use flowstate::core::Condition;
/// use flowstate::transitions;
///
/// let specs = transitions![
///     ("draft", "review"),
///     ("review", "publish", Condition::on_success()),
///     ("review", "draft"),
/// ];
/// assert_eq!(specs.len(), 3);
/// assert!(specs[0].transition.condition.is_none());
/// assert_eq!(specs[1].transition.condition_name(), Some("on_success"));
/// ```
#[macro_export]
macro_rules! transitions {
    ($($spec:expr),* $(,)?) => {
        vec![$($crate::effects::TransitionSpec::from($spec)),*]
    };
}
