//! Parse tree built by the syntax analyzer.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Display};

use crate::token::Position;

/// The grammar production a node was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum NodeKind {
    /// Root of every tree; children are statements.
    Program,
    /// `SELECT list FROM table [WHERE ...]`
    SelectStmt,
    /// The projected columns or `*`.
    SelectList,
    /// The `*` projection.
    AllColumns,
    /// `INSERT INTO table VALUES (...)`
    InsertStmt,
    /// Values of an INSERT.
    ValueList,
    /// `UPDATE table SET ... [WHERE ...]`
    UpdateStmt,
    /// Assignments of an UPDATE.
    AssignmentList,
    /// `column = value`
    Assignment,
    /// `DELETE FROM table [WHERE ...]`
    DeleteStmt,
    /// `CREATE TABLE table (...)`
    CreateStmt,
    /// Column definitions of a CREATE TABLE.
    ColumnDefList,
    /// `column TYPE`
    ColumnDef,
    /// INT, FLOAT or TEXT.
    DataType,
    /// `WHERE condition`
    WhereClause,
    /// Binary `OR`.
    OrCondition,
    /// Binary `AND`.
    AndCondition,
    /// Unary `NOT`.
    NotCondition,
    /// An expression optionally compared with another.
    Comparison,
    /// The comparison operator of a [`NodeKind::Comparison`].
    Operator,
    /// Binary `+` or `-`; the value holds the operator.
    Expression,
    /// Binary `*`, `/` or `%`; the value holds the operator.
    Term,
    /// Integer, float or string literal.
    Literal,
    /// Table or column name.
    Identifier,
}

impl NodeKind {
    /// The upper-snake-case tag of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            NodeKind::Program => "PROGRAM",
            NodeKind::SelectStmt => "SELECT_STMT",
            NodeKind::SelectList => "SELECT_LIST",
            NodeKind::AllColumns => "ALL_COLUMNS",
            NodeKind::InsertStmt => "INSERT_STMT",
            NodeKind::ValueList => "VALUE_LIST",
            NodeKind::UpdateStmt => "UPDATE_STMT",
            NodeKind::AssignmentList => "ASSIGNMENT_LIST",
            NodeKind::Assignment => "ASSIGNMENT",
            NodeKind::DeleteStmt => "DELETE_STMT",
            NodeKind::CreateStmt => "CREATE_STMT",
            NodeKind::ColumnDefList => "COLUMN_DEF_LIST",
            NodeKind::ColumnDef => "COLUMN_DEF",
            NodeKind::DataType => "DATA_TYPE",
            NodeKind::WhereClause => "WHERE_CLAUSE",
            NodeKind::OrCondition => "OR_CONDITION",
            NodeKind::AndCondition => "AND_CONDITION",
            NodeKind::NotCondition => "NOT_CONDITION",
            NodeKind::Comparison => "COMPARISON",
            NodeKind::Operator => "OPERATOR",
            NodeKind::Expression => "EXPRESSION",
            NodeKind::Term => "TERM",
            NodeKind::Literal => "LITERAL",
            NodeKind::Identifier => "IDENTIFIER",
        }
    }

    /// Whether the kind is a top-level statement.
    #[must_use]
    pub const fn is_statement(self) -> bool {
        matches!(
            self,
            NodeKind::SelectStmt
                | NodeKind::InsertStmt
                | NodeKind::UpdateStmt
                | NodeKind::DeleteStmt
                | NodeKind::CreateStmt
        )
    }

    /// Whether nodes of this kind carry a value and never have children.
    #[must_use]
    pub const fn is_leaf(self) -> bool {
        matches!(
            self,
            NodeKind::AllColumns
                | NodeKind::DataType
                | NodeKind::Operator
                | NodeKind::Literal
                | NodeKind::Identifier
        )
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the parse tree. Each node owns its children.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParseTreeNode {
    kind: NodeKind,
    value: Option<String>,
    position: Option<Position>,
    children: Vec<ParseTreeNode>,
}

impl ParseTreeNode {
    /// Create a node without value, position or children.
    #[must_use]
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            value: None,
            position: None,
            children: Vec::new(),
        }
    }

    /// Create a valued node at a position.
    #[must_use]
    pub fn leaf(kind: NodeKind, value: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            value: Some(value.into()),
            position: Some(position),
            children: Vec::new(),
        }
    }

    /// Builder-style position setter.
    #[must_use]
    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Builder-style value setter.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Builder-style child append.
    #[must_use]
    pub fn with_child(mut self, child: ParseTreeNode) -> Self {
        self.children.push(child);
        self
    }

    /// Append a child.
    pub fn push(&mut self, child: ParseTreeNode) {
        self.children.push(child);
    }

    /// The production this node was derived from.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The lexeme or operator attached to the node, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Where the node starts in the source, if recorded.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// Children in derivation order.
    #[must_use]
    pub fn children(&self) -> &[ParseTreeNode] {
        &self.children
    }

    /// The child at `index`, if present.
    #[must_use]
    pub fn child(&self, index: usize) -> Option<&ParseTreeNode> {
        self.children.get(index)
    }

    /// Take the single child out of this node.
    ///
    /// # Errors
    ///
    /// Returns the node unchanged if it does not have exactly one child.
    pub fn into_only_child(mut self) -> Result<ParseTreeNode, ParseTreeNode> {
        if self.children.len() == 1 {
            self.children.pop().ok_or(self)
        } else {
            Err(self)
        }
    }

    /// Iterate over this node and all its descendants in preorder.
    #[must_use]
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: alloc::vec![self],
        }
    }

    /// First node of the given kind in preorder, including this node.
    #[must_use]
    pub fn find(&self, kind: NodeKind) -> Option<&ParseTreeNode> {
        self.walk().find(|node| node.kind == kind)
    }

    fn fmt_outline(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        for _ in 0..depth {
            f.write_str("  ")?;
        }
        write!(f, "{}", self.kind)?;
        if let Some(value) = &self.value {
            write!(f, ": {value}")?;
        }
        if let Some(position) = self.position {
            write!(f, " [{}:{}]", position.line, position.column)?;
        }
        writeln!(f)?;
        for child in &self.children {
            child.fmt_outline(f, depth + 1)?;
        }
        Ok(())
    }
}

/// Indented outline, one node per line.
impl Display for ParseTreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_outline(f, 0)
    }
}

/// Preorder iterator returned by [`ParseTreeNode::walk`].
pub struct Walk<'a> {
    stack: Vec<&'a ParseTreeNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a ParseTreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
