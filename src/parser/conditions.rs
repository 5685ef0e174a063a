//! Boolean conditions and arithmetic expressions.
//!
//! Each precedence level is its own routine calling the next tighter level
//! and folding same-level operators into left-leaning binary nodes:
//! OR < AND < NOT / comparison < `+ -` < `* / %` < factor.

use super::{PResult, SyntaxAnalyzer};
use crate::errors::{Expected, SyntaxError};
use crate::token::{Keyword, Position, Token, TokenKind};
use crate::tree::{NodeKind, ParseTreeNode};

const COMPARISON_OPERATORS: [&str; 7] = ["=", "!=", "<>", "<", "<=", ">", ">="];
const ADDITIVE_OPERATORS: [&str; 2] = ["+", "-"];
const MULTIPLICATIVE_OPERATORS: [&str; 3] = ["*", "/", "%"];

impl SyntaxAnalyzer<'_> {
    /// Condition -> OrCond
    pub(super) fn parse_condition(&mut self) -> PResult<ParseTreeNode> {
        self.parse_or_condition()
    }

    /// OrCond -> AndCond (OR AndCond)*
    fn parse_or_condition(&mut self) -> PResult<ParseTreeNode> {
        self.fold_left(
            NodeKind::OrCondition,
            |token| token.is_keyword(Keyword::Or),
            Self::parse_and_condition,
        )
    }

    /// AndCond -> NotCond (AND NotCond)*
    fn parse_and_condition(&mut self) -> PResult<ParseTreeNode> {
        self.fold_left(
            NodeKind::AndCondition,
            |token| token.is_keyword(Keyword::And),
            Self::parse_not_condition,
        )
    }

    /// NotCond -> NOT NotCond | '(' Condition ')' | Comparison
    fn parse_not_condition(&mut self) -> PResult<ParseTreeNode> {
        if let Some(not) = self.peek_if(|token| token.is_keyword(Keyword::Not)) {
            self.bump();
            let operand = self.nested(not, Self::parse_not_condition)?;
            return Ok(ParseTreeNode::new(NodeKind::NotCondition)
                .at(not.position())
                .with_child(operand));
        }

        if let Some(open) = self.peek_if(|token| is_punct(token, "(")) {
            self.bump();
            let condition = self.nested(open, Self::parse_condition)?;
            self.expect_punct(")")?;
            let Some(operator) = self.peek_if(|token| token.kind() == TokenKind::Operator) else {
                return Ok(condition);
            };

            // The group was an arithmetic operand, as in `(a + 1) * 2 > 3`.
            let operand = match condition.kind() {
                NodeKind::Comparison => condition.into_only_child(),
                _ => Err(condition),
            }
            .map_err(|condition| misplaced_condition(&condition, operator))?;
            let term = self.fold_from(
                operand,
                NodeKind::Term,
                |token| is_operator_in(token, &MULTIPLICATIVE_OPERATORS),
                Self::parse_factor,
            )?;
            let expression = self.fold_from(
                term,
                NodeKind::Expression,
                |token| is_operator_in(token, &ADDITIVE_OPERATORS),
                Self::parse_term,
            )?;
            return self.finish_comparison(open.position(), expression);
        }

        self.parse_comparison()
    }

    /// Comparison -> Expression [CompOp Expression]
    fn parse_comparison(&mut self) -> PResult<ParseTreeNode> {
        let Some(position) = self.current_position() else {
            return Err(self.unexpected(Expected::Expression));
        };
        let left = self.parse_expression()?;
        self.finish_comparison(position, left)
    }

    /// The optional `CompOp Expression` tail of a comparison whose left
    /// operand is already parsed.
    fn finish_comparison(
        &mut self,
        position: Position,
        left: ParseTreeNode,
    ) -> PResult<ParseTreeNode> {
        let mut node = ParseTreeNode::new(NodeKind::Comparison)
            .at(position)
            .with_child(left);

        if let Some(operator) = self.peek_operator(&COMPARISON_OPERATORS) {
            self.bump();
            node.push(ParseTreeNode::leaf(
                NodeKind::Operator,
                operator.lexeme(),
                operator.position(),
            ));
            node.push(self.parse_expression()?);
        }

        Ok(node)
    }

    /// Expression -> Term (('+'|'-') Term)*
    pub(super) fn parse_expression(&mut self) -> PResult<ParseTreeNode> {
        self.fold_left(
            NodeKind::Expression,
            |token| is_operator_in(token, &ADDITIVE_OPERATORS),
            Self::parse_term,
        )
    }

    /// Term -> Factor (('*'|'/'|'%') Factor)*
    fn parse_term(&mut self) -> PResult<ParseTreeNode> {
        self.fold_left(
            NodeKind::Term,
            |token| is_operator_in(token, &MULTIPLICATIVE_OPERATORS),
            Self::parse_factor,
        )
    }

    /// Factor -> Identifier | Literal | '(' Expression ')'
    fn parse_factor(&mut self) -> PResult<ParseTreeNode> {
        let Some(token) = self.peek() else {
            return Err(self.unexpected(Expected::Expression));
        };

        match token.kind() {
            TokenKind::Punctuation if token.lexeme() == "(" => {
                self.bump();
                let expression = self.nested(token, Self::parse_expression)?;
                self.expect_punct(")")?;
                Ok(expression)
            }
            TokenKind::Identifier => self.parse_identifier(),
            kind if kind.is_literal() => {
                self.bump();
                Ok(ParseTreeNode::leaf(
                    NodeKind::Literal,
                    token.lexeme(),
                    token.position(),
                ))
            }
            _ => Err(self.unexpected(Expected::Expression)),
        }
    }

    /// Operand (Operator Operand)* folded to the left under nodes of `kind`.
    ///
    /// Arithmetic nodes keep their operator lexeme as value; OR/AND nodes
    /// are fully described by their kind.
    fn fold_left(
        &mut self,
        kind: NodeKind,
        is_operator: fn(&Token) -> bool,
        operand: fn(&mut Self) -> PResult<ParseTreeNode>,
    ) -> PResult<ParseTreeNode> {
        let first = operand(self)?;
        self.fold_from(first, kind, is_operator, operand)
    }

    /// Like [`Self::fold_left`], starting from an already parsed left operand.
    fn fold_from(
        &mut self,
        mut node: ParseTreeNode,
        kind: NodeKind,
        is_operator: fn(&Token) -> bool,
        operand: fn(&mut Self) -> PResult<ParseTreeNode>,
    ) -> PResult<ParseTreeNode> {
        while let Some(operator) = self.peek_if(is_operator) {
            self.bump();
            let right = operand(self)?;

            let mut parent = ParseTreeNode::new(kind).at(operator.position());
            if operator.kind() == TokenKind::Operator {
                parent = parent.with_value(operator.lexeme());
            }
            node = parent.with_child(node).with_child(right);
        }

        Ok(node)
    }
}

fn is_operator_in(token: &Token, operators: &[&str]) -> bool {
    token.kind() == TokenKind::Operator && operators.contains(&token.lexeme())
}

fn is_punct(token: &Token, lexeme: &str) -> bool {
    token.kind() == TokenKind::Punctuation && token.lexeme() == lexeme
}

/// Error for a parenthesized condition used as an arithmetic operand,
/// positioned on the first token that only a condition may contain.
fn misplaced_condition(condition: &ParseTreeNode, operator: &Token) -> SyntaxError {
    let first = condition
        .walk()
        .filter_map(|node| {
            let lexeme = match node.kind() {
                NodeKind::Operator => node.value()?,
                NodeKind::AndCondition => Keyword::And.as_str(),
                NodeKind::OrCondition => Keyword::Or.as_str(),
                NodeKind::NotCondition => Keyword::Not.as_str(),
                _ => return None,
            };
            Some((node.position()?, node.kind(), lexeme))
        })
        .min_by_key(|&(position, ..)| position);

    match first {
        Some((position, NodeKind::NotCondition, lexeme)) => SyntaxError::UnexpectedToken {
            expected: Expected::Expression,
            found: lexeme.into(),
            position,
        },
        Some((position, _, lexeme)) => SyntaxError::UnexpectedToken {
            expected: Expected::Lexeme(")"),
            found: lexeme.into(),
            position,
        },
        None => SyntaxError::UnexpectedToken {
            expected: Expected::Keyword(Keyword::And),
            found: operator.lexeme().into(),
            position: operator.position(),
        },
    }
}
