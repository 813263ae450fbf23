//! Usage counting over a program's expression DAG.
//!
//! Counts how many distinct places refer to each program expression, starting
//! from the outputs about to be translated. An expression referenced at most
//! once gains nothing from being bound to a variable, so the translator inlines
//! it at its single use site.

use crate::rex::node::RexNode;
use crate::rex::program::RexProgram;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageAnalysis {
    counts: Vec<usize>,
}

impl UsageAnalysis {
    /// Count references reachable from the given outputs
    pub fn for_roots<'a, I>(program: &RexProgram, roots: I) -> Self
    where
        I: IntoIterator<Item = &'a RexNode>,
    {
        let mut analysis = Self {
            counts: vec![0; program.exprs().len()],
        };
        let mut visited = vec![false; program.exprs().len()];
        for root in roots {
            analysis.visit(program, root, &mut visited);
        }
        analysis
    }

    pub fn of_projects(program: &RexProgram) -> Self {
        Self::for_roots(program, program.projects())
    }

    pub fn of_condition(program: &RexProgram) -> Self {
        Self::for_roots(program, program.condition())
    }

    fn visit(&mut self, program: &RexProgram, node: &RexNode, visited: &mut [bool]) {
        if let RexNode::LocalRef { index, .. } = node {
            self.counts[*index] += 1;
            if !visited[*index] {
                visited[*index] = true;
                self.visit(program, &program.exprs()[*index], visited);
            }
            return;
        }
        node.for_each_child(|child| self.visit(program, child, visited));
    }

    /// Number of references to program expression `index`
    pub fn count(&self, index: usize) -> usize {
        self.counts.get(index).copied().unwrap_or(0)
    }

    /// Whether expression `index` is used at most once
    pub fn is_inline(&self, index: usize) -> bool {
        self.count(index) <= 1
    }

    /// Indices of expressions used more than once
    pub fn shared(&self) -> impl Iterator<Item = usize> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 1)
            .map(|(index, _)| index)
    }
}
