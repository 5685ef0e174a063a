//! Statement-level productions and the comma-separated lists they use.

use super::{PResult, SyntaxAnalyzer};
use crate::errors::{Expected, SyntaxError};
use crate::token::{Keyword, TokenKind};
use crate::tree::{NodeKind, ParseTreeNode};

impl SyntaxAnalyzer<'_> {
    /// SelectStmt -> SELECT SelectList FROM Identifier [WHERE Condition]
    pub(super) fn parse_select(&mut self) -> PResult<ParseTreeNode> {
        let select = self.expect_keyword(Keyword::Select)?;
        let mut node = ParseTreeNode::new(NodeKind::SelectStmt).at(select.position());

        node.push(self.parse_select_list()?);
        self.expect_keyword(Keyword::From)?;
        node.push(self.parse_identifier()?);
        if let Some(where_clause) = self.parse_optional_where()? {
            node.push(where_clause);
        }

        Ok(node)
    }

    /// SelectList -> '*' | SelectItem (',' SelectItem)*
    fn parse_select_list(&mut self) -> PResult<ParseTreeNode> {
        if let Some(star) = self.peek_operator(&["*"]) {
            self.bump();
            return Ok(ParseTreeNode::new(NodeKind::SelectList)
                .at(star.position())
                .with_child(ParseTreeNode::leaf(
                    NodeKind::AllColumns,
                    star.lexeme(),
                    star.position(),
                )));
        }
        self.parse_comma_list(NodeKind::SelectList, Self::parse_expression)
    }

    /// InsertStmt -> INSERT INTO Identifier VALUES '(' ValueList ')'
    pub(super) fn parse_insert(&mut self) -> PResult<ParseTreeNode> {
        let insert = self.expect_keyword(Keyword::Insert)?;
        let mut node = ParseTreeNode::new(NodeKind::InsertStmt).at(insert.position());

        self.expect_keyword(Keyword::Into)?;
        node.push(self.parse_identifier()?);
        self.expect_keyword(Keyword::Values)?;
        self.expect_punct("(")?;
        node.push(self.parse_comma_list(NodeKind::ValueList, Self::parse_value)?);
        self.expect_punct(")")?;

        Ok(node)
    }

    /// Value -> Literal | Expression
    ///
    /// A bare literal is itself an expression, so this is the expression
    /// production.
    fn parse_value(&mut self) -> PResult<ParseTreeNode> {
        self.parse_expression()
    }

    /// UpdateStmt -> UPDATE Identifier SET AssignmentList [WHERE Condition]
    pub(super) fn parse_update(&mut self) -> PResult<ParseTreeNode> {
        let update = self.expect_keyword(Keyword::Update)?;
        let mut node = ParseTreeNode::new(NodeKind::UpdateStmt).at(update.position());

        node.push(self.parse_identifier()?);
        self.expect_keyword(Keyword::Set)?;
        node.push(self.parse_comma_list(NodeKind::AssignmentList, Self::parse_assignment)?);
        if let Some(where_clause) = self.parse_optional_where()? {
            node.push(where_clause);
        }

        Ok(node)
    }

    /// Assignment -> Identifier '=' Value
    fn parse_assignment(&mut self) -> PResult<ParseTreeNode> {
        let column = self.parse_identifier()?;
        let mut node = ParseTreeNode::new(NodeKind::Assignment);
        if let Some(position) = column.position() {
            node = node.at(position);
        }
        node.push(column);
        self.expect_operator("=")?;
        node.push(self.parse_value()?);
        Ok(node)
    }

    /// DeleteStmt -> DELETE FROM Identifier [WHERE Condition]
    pub(super) fn parse_delete(&mut self) -> PResult<ParseTreeNode> {
        let delete = self.expect_keyword(Keyword::Delete)?;
        let mut node = ParseTreeNode::new(NodeKind::DeleteStmt).at(delete.position());

        self.expect_keyword(Keyword::From)?;
        node.push(self.parse_identifier()?);
        if let Some(where_clause) = self.parse_optional_where()? {
            node.push(where_clause);
        }

        Ok(node)
    }

    /// CreateStmt -> CREATE TABLE Identifier '(' ColumnDefList ')'
    pub(super) fn parse_create(&mut self) -> PResult<ParseTreeNode> {
        let create = self.expect_keyword(Keyword::Create)?;
        let mut node = ParseTreeNode::new(NodeKind::CreateStmt).at(create.position());

        self.expect_keyword(Keyword::Table)?;
        node.push(self.parse_identifier()?);
        self.expect_punct("(")?;
        node.push(self.parse_comma_list(NodeKind::ColumnDefList, Self::parse_column_def)?);
        self.expect_punct(")")?;

        Ok(node)
    }

    /// ColumnDef -> Identifier DataType
    fn parse_column_def(&mut self) -> PResult<ParseTreeNode> {
        let column = self.parse_identifier()?;
        let mut node = ParseTreeNode::new(NodeKind::ColumnDef);
        if let Some(position) = column.position() {
            node = node.at(position);
        }
        node.push(column);
        node.push(self.parse_data_type()?);
        Ok(node)
    }

    /// DataType -> INT | FLOAT | TEXT
    fn parse_data_type(&mut self) -> PResult<ParseTreeNode> {
        let Some(token) = self.peek() else {
            return Err(self.unexpected(Expected::DataType));
        };
        let data_type = Keyword::DATA_TYPES
            .into_iter()
            .find(|keyword| token.is_keyword(*keyword));

        match data_type {
            Some(keyword) => {
                self.bump();
                Ok(ParseTreeNode::leaf(
                    NodeKind::DataType,
                    keyword.as_str(),
                    token.position(),
                ))
            }
            None => Err(SyntaxError::InvalidDataType {
                found: token.lexeme().into(),
                position: token.position(),
            }),
        }
    }

    /// WHERE Condition, if the next token is WHERE.
    fn parse_optional_where(&mut self) -> PResult<Option<ParseTreeNode>> {
        if !self.check_keyword(Keyword::Where) {
            return Ok(None);
        }
        let where_token = self.expect_keyword(Keyword::Where)?;
        let condition = self.parse_condition()?;
        Ok(Some(
            ParseTreeNode::new(NodeKind::WhereClause)
                .at(where_token.position())
                .with_child(condition),
        ))
    }

    /// Identifier -> IDENTIFIER token
    pub(super) fn parse_identifier(&mut self) -> PResult<ParseTreeNode> {
        let token = self.expect(
            |token| token.kind() == TokenKind::Identifier,
            Expected::Identifier,
        )?;
        Ok(ParseTreeNode::leaf(
            NodeKind::Identifier,
            token.lexeme(),
            token.position(),
        ))
    }

    /// Item (',' Item)* collected under a node of `kind`.
    ///
    /// An item failing after a comma aborts the whole list.
    fn parse_comma_list(
        &mut self,
        kind: NodeKind,
        item: fn(&mut Self) -> PResult<ParseTreeNode>,
    ) -> PResult<ParseTreeNode> {
        let mut list = ParseTreeNode::new(kind);
        if let Some(position) = self.current_position() {
            list = list.at(position);
        }

        list.push(item(self)?);
        while self.check_punct(",") {
            self.bump();
            list.push(item(self)?);
        }

        Ok(list)
    }
}
