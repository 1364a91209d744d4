/// A unit of input work.
pub type WorkItem = u64;

/// The value produced from a [`WorkItem`].
pub type ResultItem = u64;

/// A deterministic mapping from [`WorkItem`] to [`ResultItem`], applied by
/// every worker in a pool.
pub trait Transform: Send + Sync + 'static {
    fn apply(&self, item: WorkItem) -> ResultItem;
}

/// Doubles each item. The transform used by the default pipeline.
#[derive(Clone, Copy, Debug, Default)]
pub struct Doubler;

impl Transform for Doubler {
    fn apply(&self, item: WorkItem) -> ResultItem {
        item.wrapping_mul(2)
    }
}

impl<F> Transform for F
where
    F: Fn(WorkItem) -> ResultItem + Send + Sync + 'static,
{
    fn apply(&self, item: WorkItem) -> ResultItem {
        self(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubler_doubles() {
        assert_eq!(Doubler.apply(0), 0);
        assert_eq!(Doubler.apply(5), 10);
    }

    #[test]
    fn closures_are_transforms() {
        let square = |item: WorkItem| item * item;
        assert_eq!(square.apply(7), 49);
    }
}
