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

use derive_builder::Builder;

/// This is how you configure the output visualisation e.g.
/// if you want to see the RUB, LocB and threshold computed during the mdd
/// compilation, or if you also want to see the nodes that were deleted by
/// a restriction (or merged by a relaxation).
#[derive(Debug, Builder, Clone, Copy)]
pub struct VizConfig {
    /// This flag must be true (default) if you want to see the value of
    /// each node (length of the longest path)
    #[builder(default = "true")]
    pub show_value: bool,
    /// This flag must be true (default) if you want to see the locb of
    /// each node (length of the longest path from the bottom)
    #[builder(default = "true")]
    pub show_locb: bool,
    /// This flag must be true (default) if you want to see the rub of
    /// each node (fast upper bound)
    #[builder(default = "true")]
    pub show_rub: bool,
    /// This flag must be true (default) if you want to see the threshold
    /// associated to the exact nodes
    #[builder(default = "true")]
    pub show_threshold: bool,
    /// This flag must be true if you want to see the nodes that have been
    /// deleted because of restrict or relax operations
    #[builder(default = "false")]
    pub show_deleted: bool,
    /// This flag must be true if you want the nodes that have been merged
    /// together to be grouped in one cluster
    #[builder(default = "false")]
    pub group_merged: bool,
}

#[cfg(test)]
mod test_viz_config {
    use crate::VizConfigBuilder;

    #[test]
    fn by_default_all_values_are_shown_but_deleted_nodes_are_not() {
        let config = VizConfigBuilder::default().build().unwrap();
        assert!(config.show_value);
        assert!(config.show_locb);
        assert!(config.show_rub);
        assert!(config.show_threshold);
        assert!(!config.show_deleted);
        assert!(!config.group_merged);
    }
}
