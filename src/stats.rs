//! Only the arithmetic mean; sweeps report nothing else.

pub trait Mean {
    /// `None` for no values. Sums without overflow, converts to
    /// floating point only for the division.
    fn mean(&self) -> Option<f64>;
}

impl Mean for [u64] {
    fn mean(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let sum: u128 = self.iter().map(|v| u128::from(*v)).sum();
        Some(sum as f64 / self.len() as f64)
    }
}

#[test]
fn t_mean() {
    let empty: &[u64] = &[];
    assert_eq!(empty.mean(), None);
    assert_eq!([5u64].mean(), Some(5.));
    assert_eq!([1u64, 2].mean(), Some(1.5));
    assert_eq!([7u64; 10].mean(), Some(7.));
    assert_eq!([u64::MAX, u64::MAX].mean(), Some(u64::MAX as f64));
}
