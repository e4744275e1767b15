/// Sort key for siblings that live in separate containers.
///
/// Ordering:
/// 1) `draw_order` ascending (back to front)
/// 2) `seq` ascending, i.e. insertion order for equal draw orders
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct SortKey {
    pub draw_order: i32,
    pub seq: u64,
}

impl SortKey {
    #[inline]
    pub const fn new(draw_order: i32, seq: u64) -> Self {
        Self { draw_order, seq }
    }
}
