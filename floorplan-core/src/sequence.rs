/// Monotonic request counter. Fetches are never cancelled, so each response
/// is checked against the latest issued number before it may touch state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequestSequence {
    issued: u64,
}

impl RequestSequence {
    pub fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    pub fn is_latest(&self, seq: u64) -> bool {
        seq == self.issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_newest_number_is_latest() {
        let mut seq = RequestSequence::default();
        let a = seq.issue();
        let b = seq.issue();
        assert!(!seq.is_latest(a));
        assert!(seq.is_latest(b));
        assert!(!seq.is_latest(0));
    }
}
