// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! A compact set of flags attached to each node of a decision diagram.

/// The flags relating to one node of the diagram. They tell whether the node:
/// - is exact (all its paths from the root only traverse exact nodes),
/// - is relaxed (it results from a merge),
/// - is marked (it reaches the terminal node in a bottom-up traversal),
/// - belongs to the cutset, or sits above it,
/// - was deleted by a restriction or a merge,
/// - was pruned by the cache or by dominance before being expanded.
///
/// # Remark
/// A relaxed node is never exact. But an inexact node needs not be relaxed:
/// it suffices that one of its ancestors is.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct NodeFlags(u8);
impl NodeFlags {
    pub const F_EXACT: u8 = 1;
    pub const F_RELAXED: u8 = 2;
    pub const F_MARKED: u8 = 4;
    pub const F_CUTSET: u8 = 8;
    pub const F_DELETED: u8 = 16;
    pub const F_PRUNED: u8 = 32;
    pub const F_ABOVE_CUTSET: u8 = 64;

    #[inline]
    pub fn new_exact() -> Self {
        NodeFlags(NodeFlags::F_EXACT)
    }
    #[inline]
    pub fn new_relaxed() -> Self {
        NodeFlags(NodeFlags::F_RELAXED)
    }
    /// Returns true iff the exact flag is on and the relaxed flag is off
    #[inline]
    pub fn is_exact(self) -> bool {
        self.test(NodeFlags::F_EXACT) && !self.test(NodeFlags::F_RELAXED)
    }
    #[inline]
    pub fn is_relaxed(self) -> bool {
        self.test(NodeFlags::F_RELAXED)
    }
    #[inline]
    pub fn is_marked(self) -> bool {
        self.test(NodeFlags::F_MARKED)
    }
    #[inline]
    pub fn is_cutset(self) -> bool {
        self.test(NodeFlags::F_CUTSET)
    }
    #[inline]
    pub fn is_above_cutset(self) -> bool {
        self.test(NodeFlags::F_ABOVE_CUTSET)
    }
    #[inline]
    pub fn is_deleted(self) -> bool {
        self.test(NodeFlags::F_DELETED)
    }
    #[inline]
    pub fn is_pruned(self) -> bool {
        self.test(NodeFlags::F_PRUNED)
    }
    #[inline]
    pub fn set_exact(&mut self, exact: bool) {
        self.set(NodeFlags::F_EXACT, exact)
    }
    #[inline]
    pub fn set_relaxed(&mut self, relaxed: bool) {
        self.set(NodeFlags::F_RELAXED, relaxed)
    }
    #[inline]
    pub fn set_marked(&mut self, marked: bool) {
        self.set(NodeFlags::F_MARKED, marked)
    }
    #[inline]
    pub fn set_cutset(&mut self, cutset: bool) {
        self.set(NodeFlags::F_CUTSET, cutset)
    }
    #[inline]
    pub fn set_above_cutset(&mut self, above: bool) {
        self.set(NodeFlags::F_ABOVE_CUTSET, above)
    }
    #[inline]
    pub fn set_deleted(&mut self, deleted: bool) {
        self.set(NodeFlags::F_DELETED, deleted)
    }
    #[inline]
    pub fn set_pruned(&mut self, pruned: bool) {
        self.set(NodeFlags::F_PRUNED, pruned)
    }
    /// Checks whether all the flags encoded in the given mask are turned on.
    #[inline]
    pub fn test(self, mask: u8) -> bool {
        self.0 & mask == mask
    }
    #[inline]
    pub fn set(&mut self, flag: u8, value: bool) {
        if value {
            self.0 |= flag;
        } else {
            self.0 &= !flag;
        }
    }
}
impl Default for NodeFlags {
    fn default() -> Self {
        NodeFlags::new_exact()
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
#[allow(clippy::bool_assert_comparison)]
mod test_node_flags {
    use super::NodeFlags;

    #[test]
    fn by_default_a_node_is_exact_and_nothing_else() {
        let flags = NodeFlags::default();
        assert_eq!(true, flags.is_exact());
        assert_eq!(false, flags.is_relaxed());
        assert_eq!(false, flags.is_marked());
        assert_eq!(false, flags.is_cutset());
        assert_eq!(false, flags.is_above_cutset());
        assert_eq!(false, flags.is_deleted());
        assert_eq!(false, flags.is_pruned());
    }
    #[test]
    fn a_relaxed_node_is_never_exact() {
        let mut flags = NodeFlags::new_relaxed();
        assert_eq!(false, flags.is_exact());
        flags.set_exact(true);
        assert_eq!(false, flags.is_exact());
        flags.set_relaxed(false);
        assert_eq!(true, flags.is_exact());
    }
    #[test]
    fn an_inexact_node_needs_not_be_relaxed() {
        let mut flags = NodeFlags::new_exact();
        flags.set_exact(false);
        assert_eq!(false, flags.is_exact());
        assert_eq!(false, flags.is_relaxed());
    }
    #[test]
    fn setting_one_flag_leaves_the_others_untouched() {
        let mut flags = NodeFlags::new_exact();
        flags.set_marked(true);
        flags.set_cutset(true);
        flags.set_pruned(true);
        assert_eq!(true, flags.is_exact());
        assert_eq!(true, flags.is_marked());
        assert_eq!(true, flags.is_cutset());
        assert_eq!(true, flags.is_pruned());
        assert_eq!(false, flags.is_deleted());

        flags.set_cutset(false);
        assert_eq!(false, flags.is_cutset());
        assert_eq!(true, flags.is_marked());
        assert_eq!(true, flags.is_pruned());
    }
    #[test]
    fn test_checks_all_flags_of_the_mask() {
        let mut flags = NodeFlags::new_exact();
        flags.set_deleted(true);
        assert!(flags.test(NodeFlags::F_EXACT | NodeFlags::F_DELETED));
        assert!(!flags.test(NodeFlags::F_EXACT | NodeFlags::F_ABOVE_CUTSET));
    }
}
