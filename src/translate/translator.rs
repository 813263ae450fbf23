//! Expression translator.
//!
//! Walks a program's expression DAG depth-first, memoizing the lowered form of
//! every node it meets. The memo ("slot" map) is what eliminates common
//! subexpressions: a node reached a second time reuses the variable or
//! expression recorded on the first visit. A node is bound to a fresh `final`
//! variable unless it is a back-reference (materialized where it is defined)
//! or the inline policy says it is not worth naming.

use crate::lix::{BlockBuilder, Expression, ParameterExpression};
use crate::rex::{RexNode, RexProgram, UsageAnalysis};
use crate::translate::error::{TranslateError, TranslateResult};
use crate::translate::implementor::ImpTable;
use crate::translate::input::InputGetter;
use crate::translate::literal::translate_literal;
use crate::types::{HostType, LogicalType, TypeAdapter};
use log::{debug, trace};
use std::collections::{HashMap, HashSet};

/// Which nodes the translator binds to variables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InlinePolicy {
    /// Name only program expressions referenced more than once
    #[default]
    UsageCount,
    /// Name every node except back-references
    MaterializeAll,
}

/// Translation settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatorConfig {
    pub inline_policy: InlinePolicy,
    /// Prefix of generated variable names
    pub variable_prefix: String,
    /// Lower logic and comparisons to host operators instead of runtime calls
    pub native_operators: bool,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            inline_policy: InlinePolicy::default(),
            variable_prefix: "v".to_string(),
            native_operators: false,
        }
    }
}

/// Slots are keyed by node identity. Local references compare by index, as
/// two references to the same expression denote the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum SlotKey {
    Local(usize),
    Node(*const RexNode),
}

impl SlotKey {
    fn of(node: &RexNode) -> Self {
        match node {
            RexNode::LocalRef { index, .. } => SlotKey::Local(*index),
            other => SlotKey::Node(other as *const RexNode),
        }
    }
}

#[derive(Debug)]
struct Slot {
    parameter: Option<ParameterExpression>,
    expression: Expression,
    count: usize,
}

impl Slot {
    fn expression(&self) -> Expression {
        match &self.parameter {
            Some(parameter) => Expression::Parameter(parameter.clone()),
            None => self.expression.clone(),
        }
    }
}

/// Translates row expressions of one program into lix expressions.
///
/// A translator serves a single pass: its slot map and the block it appends
/// to must not be shared with another pass.
pub struct RexToLixTranslator<'a> {
    program: &'a RexProgram,
    type_adapter: &'a dyn TypeAdapter,
    input_getter: &'a dyn InputGetter,
    block: &'a mut BlockBuilder,
    table: &'a ImpTable,
    config: TranslatorConfig,
    map: HashMap<SlotKey, Slot>,
    /// Program expressions worth naming under `InlinePolicy::UsageCount`
    shared: HashSet<*const RexNode>,
}

impl<'a> RexToLixTranslator<'a> {
    pub fn new(
        program: &'a RexProgram,
        type_adapter: &'a dyn TypeAdapter,
        input_getter: &'a dyn InputGetter,
        block: &'a mut BlockBuilder,
        config: TranslatorConfig,
    ) -> Self {
        let table = if config.native_operators {
            ImpTable::native_instance()
        } else {
            ImpTable::instance()
        };
        Self {
            program,
            type_adapter,
            input_getter,
            block,
            table,
            config,
            map: HashMap::new(),
            shared: HashSet::new(),
        }
    }

    /// Use a table other than the one the config selects
    pub fn with_table(mut self, table: &'a ImpTable) -> Self {
        self.table = table;
        self
    }

    /// Translate a list of outputs, in order.
    ///
    /// Runs the usage analysis over `nodes` first, so the inline decisions
    /// account for every use within the list.
    pub fn translate_list(&mut self, nodes: &'a [RexNode]) -> TranslateResult<Vec<Expression>> {
        self.analyze(nodes);
        nodes.iter().map(|node| self.translate(node)).collect()
    }

    fn analyze(&mut self, roots: &[RexNode]) {
        if self.config.inline_policy != InlinePolicy::UsageCount {
            return;
        }
        let usage = UsageAnalysis::for_roots(self.program, roots);
        let exprs = self.program.exprs();
        self.shared
            .extend(usage.shared().map(|index| &exprs[index] as *const RexNode));
    }

    /// Translate one node, reusing its slot if it was translated before.
    ///
    /// Slots are keyed by address, so `node` must outlive the translator.
    pub fn translate(&mut self, node: &'a RexNode) -> TranslateResult<Expression> {
        let key = SlotKey::of(node);
        if let Some(slot) = self.map.get_mut(&key) {
            slot.count += 1;
            trace!("reuse {} (used {} times)", node, slot.count);
            return Ok(slot.expression());
        }

        let expression = self.translate0(node)?;
        let parameter = if self.should_materialize(node) {
            let name = format!("{}{}", self.config.variable_prefix, self.map.len());
            Some(self.block.declare_final(&name, expression.clone()))
        } else {
            None
        };
        let slot = Slot {
            parameter,
            expression,
            count: 1,
        };
        let result = slot.expression();
        self.map.insert(key, slot);
        Ok(result)
    }

    fn should_materialize(&self, node: &RexNode) -> bool {
        if let RexNode::LocalRef { .. } = node {
            return false;
        }
        match self.config.inline_policy {
            InlinePolicy::MaterializeAll => true,
            InlinePolicy::UsageCount => self.shared.contains(&(node as *const RexNode)),
        }
    }

    fn translate0(&mut self, node: &'a RexNode) -> TranslateResult<Expression> {
        match node {
            RexNode::InputRef { index, .. } => {
                let getter = self.input_getter;
                getter.field(self.block, *index)
            }
            RexNode::LocalRef { index, .. } => {
                let program = self.program;
                match program.expr(*index) {
                    Some(expr) => self.translate(expr),
                    None => Err(unsupported(node)),
                }
            }
            RexNode::Literal { value, ty } => Ok(translate_literal(value, ty, self.type_adapter)),
            RexNode::Call { .. } | RexNode::Case { .. } => {
                let operator = node.operator().ok_or_else(|| unsupported(node))?;
                let table = self.table;
                match table.get(operator) {
                    Some(implementor) => implementor.implement(self, node),
                    None => Err(TranslateError::UnsupportedOperator { operator }),
                }
            }
            RexNode::DynamicParam { .. } => Err(unsupported(node)),
        }
    }

    /// Translate each operand of a call, in order
    pub fn translate_operands(&mut self, call: &'a RexNode) -> TranslateResult<Vec<Expression>> {
        call.operands()
            .iter()
            .map(|operand| self.translate(operand))
            .collect()
    }

    /// Host type of a logical type, via the pass's type adapter
    pub fn host_type(&self, ty: &LogicalType) -> HostType {
        self.type_adapter.host_type(ty)
    }

    /// How many times `node` has been looked up during this pass
    pub fn usage_count(&self, node: &RexNode) -> usize {
        self.map
            .get(&SlotKey::of(node))
            .map(|slot| slot.count)
            .unwrap_or(0)
    }
}

fn unsupported(node: &RexNode) -> TranslateError {
    TranslateError::UnsupportedExpressionKind {
        kind: node.kind(),
        digest: node.to_string(),
    }
}

/// Translate a program's projections with the default configuration.
///
/// Declarations needed by the returned expressions are appended to `block`
/// in dependency order. On error `block` is left as it was.
pub fn translate_projects(
    program: &RexProgram,
    type_adapter: &dyn TypeAdapter,
    block: &mut BlockBuilder,
    input_getter: &dyn InputGetter,
) -> TranslateResult<Vec<Expression>> {
    translate_projects_with(
        program,
        type_adapter,
        block,
        input_getter,
        &TranslatorConfig::default(),
    )
}

pub fn translate_projects_with(
    program: &RexProgram,
    type_adapter: &dyn TypeAdapter,
    block: &mut BlockBuilder,
    input_getter: &dyn InputGetter,
    config: &TranslatorConfig,
) -> TranslateResult<Vec<Expression>> {
    let checkpoint = block.checkpoint();
    let before = block.len();
    let result = RexToLixTranslator::new(program, type_adapter, input_getter, block, config.clone())
        .translate_list(program.projects());
    match &result {
        Ok(expressions) => debug!(
            "translated {} projections, {} declarations added",
            expressions.len(),
            block.len() - before
        ),
        Err(e) => {
            debug!("projection translation failed: {}", e);
            block.rollback(checkpoint);
        }
    }
    result
}

/// Translate a program's condition, or constant `true` if it has none
pub fn translate_condition(
    program: &RexProgram,
    type_adapter: &dyn TypeAdapter,
    block: &mut BlockBuilder,
    input_getter: &dyn InputGetter,
) -> TranslateResult<Expression> {
    translate_condition_with(
        program,
        type_adapter,
        block,
        input_getter,
        &TranslatorConfig::default(),
    )
}

pub fn translate_condition_with(
    program: &RexProgram,
    type_adapter: &dyn TypeAdapter,
    block: &mut BlockBuilder,
    input_getter: &dyn InputGetter,
    config: &TranslatorConfig,
) -> TranslateResult<Expression> {
    let condition = match program.condition() {
        Some(condition) => condition,
        None => return Ok(Expression::boolean(true)),
    };
    let checkpoint = block.checkpoint();
    let result = RexToLixTranslator::new(program, type_adapter, input_getter, block, config.clone())
        .translate_list(std::slice::from_ref(condition))
        .map(|mut expressions| expressions.remove(0));
    if let Err(e) = &result {
        debug!("condition translation failed: {}", e);
        block.rollback(checkpoint);
    }
    result
}
