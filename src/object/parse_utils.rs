/// Find the first occurrence of `c` at or after `start`, as an absolute index.
pub(crate) fn find_from(s: &[u8], start: usize, c: u8) -> Option<usize> {
    s.get(start..)?
        .iter()
        .position(|b| *b == c)
        .map(|n| start + n)
}
