use crate::diagnostics;
use crate::expr;
use crate::scanner;

const MAX_ARITY: usize = 255;
const MAX_DEPTH: usize = 64;

struct Parser<'a> {
    tokens: Vec<scanner::Token>,
    current: usize,
    depth: usize,
    diagnostics: &'a mut diagnostics::Diagnostics,
}

#[derive(Debug)]
enum Error {
    TokenMismatch {
        found: scanner::Token,
        message: String,
    },
    ExpectedExpression {
        found: scanner::Token,
    },
    TooDeep {
        found: scanner::Token,
    },
}

impl Error {
    fn token(&self) -> &scanner::Token {
        match self {
            Error::TokenMismatch { found, .. } => found,
            Error::ExpectedExpression { found } => found,
            Error::TooDeep { found } => found,
        }
    }

    fn message(&self) -> String {
        match self {
            Error::TokenMismatch { message, .. } => message.clone(),
            Error::ExpectedExpression { .. } => "Expect expression.".into(),
            Error::TooDeep { .. } => "Nesting too deep.".into(),
        }
    }
}

/*
Parses a whole token stream. Syntax errors are recorded in `diagnostics`;
the statements that parsed cleanly are still returned, so callers must check
`diagnostics.has_errors()` before trusting the result.
*/
pub fn parse(
    mut tokens: Vec<scanner::Token>,
    diagnostics: &mut diagnostics::Diagnostics,
) -> Vec<expr::Stmt> {
    if tokens.last().map(|tok| tok.ty) != Some(scanner::TokenType::Eof) {
        let line = tokens.last().map_or(1, |tok| tok.line);
        tokens.push(scanner::Token {
            ty: scanner::TokenType::Eof,
            lexeme: String::new(),
            literal: None,
            line,
            col: 0,
        });
    }

    let mut p = Parser {
        tokens,
        current: 0,
        depth: 0,
        diagnostics,
    };

    p.parse()
}

/*
Recursive descent using the following grammar

program     → declaration* EOF ;

declaration → "(" "Define" definition
            | statement ;

definition  → IDENTIFIER "(" parameters? ")" block
            | IDENTIFIER ( "=" expression )? ")" ;
parameters  → IDENTIFIER ( "," IDENTIFIER )* ;
block       → declaration* ")" ;

statement   → condStmt
            | exprStmt ;

condStmt    → "Cond" "(" expression ")" statement ( "'t" statement )? ;
exprStmt    → expression ";" ;

expression → assignment ;
assignment → logic_or ( "=" assignment )? ;
logic_or   → logic_and ( "or" logic_and )* ;
logic_and  → equality ( "and" equality )* ;

equality       → comparison ( "==" comparison )* ;
comparison     → addition ( ( ">" | ">=" | "<" | "<=" ) addition )* ;
addition       → multiplication ( ( "-" | "+" ) multiplication )* ;
multiplication → unary ( ( "/" | "*" ) unary )* ;
unary → "-" unary | call ;
call → primary ( "(" arguments? ")" )* ;
arguments → expression ( "," expression )* ;

primary → "true" | "false" | "nil"
        | NUMBER | STRING | IDENTIFIER | "(" expression ")" ;

*/
impl<'a> Parser<'a> {
    fn parse(&mut self) -> Vec<expr::Stmt> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        statements
    }

    fn declaration(&mut self) -> Option<expr::Stmt> {
        let stmt_or_err = if self.starts_definition() {
            self.advance();
            self.advance();
            self.definition()
        } else {
            self.statement()
        };

        match stmt_or_err {
            Ok(stmt) => Some(stmt),
            Err(err) => {
                self.diagnostics.report_token(err.token(), &err.message());
                self.synchronize();
                None
            }
        }
    }

    fn starts_definition(&self) -> bool {
        self.check(scanner::TokenType::LeftParen) && self.check_next(scanner::TokenType::Define)
    }

    fn definition(&mut self) -> Result<expr::Stmt, Error> {
        let name_tok = self
            .consume(
                scanner::TokenType::Identifier,
                "Expect variable or function name after 'Define'.",
            )?
            .clone();

        let name = Parser::symbol(&name_tok);

        if self.matches(scanner::TokenType::LeftParen) {
            let fun = self.nested(|p| p.fun_decl(name))?;
            return Ok(expr::Stmt::FunDecl(fun));
        }

        self.var_decl(name)
    }

    fn fun_decl(&mut self, name: expr::Symbol) -> Result<expr::FunDecl, Error> {
        let mut parameters = Vec::new();

        if !self.check(scanner::TokenType::RightParen) {
            loop {
                if parameters.len() == MAX_ARITY {
                    let peek_tok = self.peek().clone();
                    self.diagnostics
                        .report_token(&peek_tok, "Can't have more than 255 parameters.");
                }

                let tok = self
                    .consume(scanner::TokenType::Identifier, "Expect parameter name.")?
                    .clone();

                parameters.push(Parser::symbol(&tok));

                if !self.matches(scanner::TokenType::Comma) {
                    break;
                }
            }
        }
        let parameters = parameters;

        self.consume(
            scanner::TokenType::RightParen,
            "Expect ')' after parameters.",
        )?;

        let body = self.block()?;

        Ok(expr::FunDecl {
            name,
            params: parameters,
            body,
        })
    }

    fn var_decl(&mut self, name: expr::Symbol) -> Result<expr::Stmt, Error> {
        let maybe_initializer = if self.matches(scanner::TokenType::Equal) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(
            scanner::TokenType::RightParen,
            "Expect ')' after variable declaration.",
        )?;

        Ok(expr::Stmt::VarDecl(name, maybe_initializer))
    }

    fn block(&mut self) -> Result<Vec<expr::Stmt>, Error> {
        let mut stmts = Vec::new();

        while !self.check(scanner::TokenType::RightParen) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                stmts.push(stmt)
            }
        }

        self.consume(scanner::TokenType::RightParen, "Expect ')' after block.")?;

        Ok(stmts)
    }

    fn statement(&mut self) -> Result<expr::Stmt, Error> {
        if self.matches(scanner::TokenType::Cond) {
            return self.cond_statement();
        }

        self.expression_statement()
    }

    fn cond_statement(&mut self) -> Result<expr::Stmt, Error> {
        self.consume(scanner::TokenType::LeftParen, "Expect '(' after 'Cond'.")?;
        let cond = self.expression()?;
        self.consume(
            scanner::TokenType::RightParen,
            "Expect ')' after condition.",
        )?;
        let then_branch = Box::new(self.nested(Parser::statement)?);
        let maybe_else_branch = if self.matches(scanner::TokenType::Else) {
            Some(Box::new(self.nested(Parser::statement)?))
        } else {
            None
        };

        Ok(expr::Stmt::Cond(cond, then_branch, maybe_else_branch))
    }

    fn expression_statement(&mut self) -> Result<expr::Stmt, Error> {
        let expr = self.expression()?;
        self.consume(
            scanner::TokenType::Semicolon,
            "Expect ';' after expression.",
        )?;
        Ok(expr::Stmt::Expr(expr))
    }

    fn expression(&mut self) -> Result<expr::Expr, Error> {
        self.assignment()
    }

    fn assignment(&mut self) -> Result<expr::Expr, Error> {
        let expr = self.or()?;

        if self.matches(scanner::TokenType::Equal) {
            let equals = self.previous().clone();
            let value = self.nested(Parser::assignment)?;

            return match expr {
                expr::Expr::Variable(sym) => Ok(expr::Expr::Assign(sym, Box::new(value))),
                expr::Expr::Get(e, attr) => Ok(expr::Expr::Set(e, attr, Box::new(value))),
                other => {
                    self.diagnostics
                        .report_token(&equals, "Invalid assignment target.");
                    Ok(other)
                }
            };
        }

        Ok(expr)
    }

    fn or(&mut self) -> Result<expr::Expr, Error> {
        let mut expr = self.and()?;

        while self.matches(scanner::TokenType::Or) {
            let op = Parser::logical_op(self.previous(), expr::LogicalOpTy::Or);
            let right = self.and()?;
            expr = expr::Expr::Logical(Box::new(expr), op, Box::new(right));
        }

        Ok(expr)
    }

    fn and(&mut self) -> Result<expr::Expr, Error> {
        let mut expr = self.equality()?;

        while self.matches(scanner::TokenType::And) {
            let op = Parser::logical_op(self.previous(), expr::LogicalOpTy::And);
            let right = self.equality()?;
            expr = expr::Expr::Logical(Box::new(expr), op, Box::new(right));
        }

        Ok(expr)
    }

    fn equality(&mut self) -> Result<expr::Expr, Error> {
        self.binary(
            &[(scanner::TokenType::EqualEqual, expr::BinaryOpTy::EqualEqual)],
            Parser::comparison,
        )
    }

    fn comparison(&mut self) -> Result<expr::Expr, Error> {
        self.binary(
            &[
                (scanner::TokenType::Greater, expr::BinaryOpTy::Greater),
                (scanner::TokenType::GreaterEqual, expr::BinaryOpTy::GreaterEqual),
                (scanner::TokenType::Less, expr::BinaryOpTy::Less),
                (scanner::TokenType::LessEqual, expr::BinaryOpTy::LessEqual),
            ],
            Parser::addition,
        )
    }

    fn addition(&mut self) -> Result<expr::Expr, Error> {
        self.binary(
            &[
                (scanner::TokenType::Minus, expr::BinaryOpTy::Minus),
                (scanner::TokenType::Plus, expr::BinaryOpTy::Plus),
            ],
            Parser::multiplication,
        )
    }

    fn multiplication(&mut self) -> Result<expr::Expr, Error> {
        self.binary(
            &[
                (scanner::TokenType::Slash, expr::BinaryOpTy::Slash),
                (scanner::TokenType::Star, expr::BinaryOpTy::Star),
            ],
            Parser::unary,
        )
    }

    // One left-associative precedence level: operand ( op operand )*
    fn binary(
        &mut self,
        operators: &[(scanner::TokenType, expr::BinaryOpTy)],
        operand: fn(&mut Parser<'a>) -> Result<expr::Expr, Error>,
    ) -> Result<expr::Expr, Error> {
        let mut expr = operand(self)?;

        while let Some(ty) = self.match_binary_op(operators) {
            let operator_token = self.previous().clone();
            let right = Box::new(operand(self)?);
            let binop = expr::BinaryOp {
                ty,
                line: operator_token.line,
                col: operator_token.col,
            };

            expr = expr::Expr::Binary(Box::new(expr), binop, right);
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<expr::Expr, Error> {
        if self.matches(scanner::TokenType::Minus) {
            let operator_token = self.previous().clone();
            let right = Box::new(self.nested(Parser::unary)?);

            return Ok(expr::Expr::Unary(
                expr::UnaryOp {
                    ty: expr::UnaryOpTy::Minus,
                    line: operator_token.line,
                    col: operator_token.col,
                },
                right,
            ));
        }
        self.call()
    }

    fn call(&mut self) -> Result<expr::Expr, Error> {
        let mut expr = self.primary()?;

        while self.matches(scanner::TokenType::LeftParen) {
            expr = self.finish_call(expr)?;
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: expr::Expr) -> Result<expr::Expr, Error> {
        let mut arguments = Vec::new();

        if !self.check(scanner::TokenType::RightParen) {
            loop {
                if arguments.len() == MAX_ARITY {
                    let peek_tok = self.peek().clone();
                    self.diagnostics
                        .report_token(&peek_tok, "Can't have more than 255 arguments.");
                }
                arguments.push(self.nested(Parser::expression)?);
                if !self.matches(scanner::TokenType::Comma) {
                    break;
                }
            }
        }

        let token = self.consume(
            scanner::TokenType::RightParen,
            "Expect ')' after arguments.",
        )?;

        Ok(expr::Expr::Call(
            Box::new(callee),
            expr::SourceLocation {
                line: token.line,
                col: token.col,
            },
            arguments,
        ))
    }

    fn primary(&mut self) -> Result<expr::Expr, Error> {
        if self.matches(scanner::TokenType::False) {
            return Ok(expr::Expr::Literal(expr::Literal::False));
        }
        if self.matches(scanner::TokenType::True) {
            return Ok(expr::Expr::Literal(expr::Literal::True));
        }
        if self.matches(scanner::TokenType::Nil) {
            return Ok(expr::Expr::Literal(expr::Literal::Nil));
        }
        if self.matches(scanner::TokenType::Number) {
            if let Some(scanner::Literal::Number(n)) = &self.previous().literal {
                return Ok(expr::Expr::Literal(expr::Literal::Number(*n)));
            }
            return Err(Error::ExpectedExpression {
                found: self.previous().clone(),
            });
        }
        if self.matches(scanner::TokenType::String) {
            if let Some(scanner::Literal::Str(s)) = &self.previous().literal {
                return Ok(expr::Expr::Literal(expr::Literal::String(s.clone())));
            }
            return Err(Error::ExpectedExpression {
                found: self.previous().clone(),
            });
        }
        if self.matches(scanner::TokenType::Identifier) {
            return Ok(expr::Expr::Variable(Parser::symbol(self.previous())));
        }
        if self.matches(scanner::TokenType::LeftParen) {
            let expr = Box::new(self.nested(Parser::expression)?);
            self.consume(
                scanner::TokenType::RightParen,
                "Expect ')' after expression.",
            )?;
            return Ok(expr::Expr::Grouping(expr));
        }

        Err(Error::ExpectedExpression {
            found: self.peek().clone(),
        })
    }

    // Runs a rule one nesting level deeper. Every recursive rule goes through
    // here, so deeply nested input is reported instead of exhausting the stack.
    fn nested<T>(
        &mut self,
        rule: impl FnOnce(&mut Parser<'a>) -> Result<T, Error>,
    ) -> Result<T, Error> {
        if self.depth == MAX_DEPTH {
            return Err(Error::TooDeep {
                found: self.peek().clone(),
            });
        }

        self.depth += 1;
        let res = rule(self);
        self.depth -= 1;
        res
    }

    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().ty == scanner::TokenType::Semicolon {
                return;
            }

            if self.check(scanner::TokenType::Cond) || self.starts_definition() {
                return;
            }

            self.advance();
        }
    }

    fn consume(
        &mut self,
        tok: scanner::TokenType,
        on_err_str: &str,
    ) -> Result<&scanner::Token, Error> {
        if self.check(tok) {
            return Ok(self.advance());
        }
        Err(Error::TokenMismatch {
            found: self.peek().clone(),
            message: on_err_str.into(),
        })
    }

    fn symbol(tok: &scanner::Token) -> expr::Symbol {
        expr::Symbol {
            name: tok.lexeme.clone(),
            line: tok.line,
            col: tok.col,
        }
    }

    fn logical_op(tok: &scanner::Token, ty: expr::LogicalOpTy) -> expr::LogicalOp {
        expr::LogicalOp {
            ty,
            line: tok.line,
            col: tok.col,
        }
    }

    fn match_binary_op(
        &mut self,
        operators: &[(scanner::TokenType, expr::BinaryOpTy)],
    ) -> Option<expr::BinaryOpTy> {
        let ty = operators
            .iter()
            .find(|(tok, _)| self.check(*tok))
            .map(|(_, ty)| *ty)?;
        self.advance();
        Some(ty)
    }

    fn matches(&mut self, ty: scanner::TokenType) -> bool {
        if self.check(ty) {
            self.advance();
            return true;
        }
        false
    }

    fn check(&self, ty: scanner::TokenType) -> bool {
        if self.is_at_end() {
            return false;
        }

        self.peek().ty == ty
    }

    fn check_next(&self, ty: scanner::TokenType) -> bool {
        match self.tokens.get(self.current + 1) {
            Some(tok) => tok.ty == ty,
            None => false,
        }
    }

    fn advance(&mut self) -> &scanner::Token {
        if !self.is_at_end() {
            self.current += 1
        }

        self.previous()
    }

    fn is_at_end(&self) -> bool {
        self.peek().ty == scanner::TokenType::Eof
    }

    fn peek(&self) -> &scanner::Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &scanner::Token {
        &self.tokens[self.current - 1]
    }
}

#[cfg(test)]
mod tests {
    use crate::diagnostics::Diagnostics;
    use crate::expr::*;
    use crate::parser;
    use crate::scanner;

    fn parse_src(code: &str) -> (Vec<Stmt>, Diagnostics) {
        let mut diagnostics = Diagnostics::default();
        let tokens = scanner::scan_tokens(code, &mut diagnostics);
        assert!(!diagnostics.has_errors(), "lexical errors in {:?}", code);
        let stmts = parser::parse(tokens, &mut diagnostics);
        (stmts, diagnostics)
    }

    fn messages(diagnostics: &Diagnostics) -> Vec<String> {
        diagnostics.iter().map(|d| d.to_string()).collect()
    }

    fn show_expr(expr: &Expr) -> String {
        match expr {
            Expr::Literal(Literal::Number(n)) => format!("{}", n),
            Expr::Literal(Literal::String(s)) => format!("{:?}", s),
            Expr::Literal(Literal::True) => "true".into(),
            Expr::Literal(Literal::False) => "false".into(),
            Expr::Literal(Literal::Nil) => "nil".into(),
            Expr::Grouping(e) => format!("(group {})", show_expr(e)),
            Expr::Unary(_, e) => format!("(- {})", show_expr(e)),
            Expr::Binary(l, op, r) => {
                let op = match op.ty {
                    BinaryOpTy::EqualEqual => "==",
                    BinaryOpTy::Less => "<",
                    BinaryOpTy::LessEqual => "<=",
                    BinaryOpTy::Greater => ">",
                    BinaryOpTy::GreaterEqual => ">=",
                    BinaryOpTy::Plus => "+",
                    BinaryOpTy::Minus => "-",
                    BinaryOpTy::Star => "*",
                    BinaryOpTy::Slash => "/",
                };
                format!("({} {} {})", op, show_expr(l), show_expr(r))
            }
            Expr::Logical(l, op, r) => {
                let op = match op.ty {
                    LogicalOpTy::Or => "or",
                    LogicalOpTy::And => "and",
                };
                format!("({} {} {})", op, show_expr(l), show_expr(r))
            }
            Expr::Variable(sym) => sym.name.clone(),
            Expr::Assign(sym, value) => format!("(= {} {})", sym.name, show_expr(value)),
            Expr::Call(callee, _, args) => {
                let mut out = format!("(call {}", show_expr(callee));
                for arg in args {
                    out.push(' ');
                    out.push_str(&show_expr(arg));
                }
                out.push(')');
                out
            }
            Expr::Get(obj, sym) => format!("(. {} {})", show_expr(obj), sym.name),
            Expr::Set(obj, sym, value) => format!(
                "(= (. {} {}) {})",
                show_expr(obj),
                sym.name,
                show_expr(value)
            ),
        }
    }

    fn show_stmt(stmt: &Stmt) -> String {
        match stmt {
            Stmt::Expr(e) => format!("{};", show_expr(e)),
            Stmt::VarDecl(name, Some(init)) => {
                format!("(Define {} = {})", name.name, show_expr(init))
            }
            Stmt::VarDecl(name, None) => format!("(Define {})", name.name),
            Stmt::FunDecl(fun) => {
                let params: Vec<&str> = fun.params.iter().map(|p| p.name.as_str()).collect();
                let mut out = format!("(Define {}({})", fun.name.name, params.join(", "));
                for stmt in &fun.body {
                    out.push(' ');
                    out.push_str(&show_stmt(stmt));
                }
                out.push(')');
                out
            }
            Stmt::Cond(cond, then_branch, Some(else_branch)) => format!(
                "Cond ({}) {} 't {}",
                show_expr(cond),
                show_stmt(then_branch),
                show_stmt(else_branch)
            ),
            Stmt::Cond(cond, then_branch, None) => {
                format!("Cond ({}) {}", show_expr(cond), show_stmt(then_branch))
            }
            other => format!("{:?}", other),
        }
    }

    fn check_ast(code: &str, expected: &[&str]) {
        let (stmts, diagnostics) = parse_src(code);
        assert!(
            !diagnostics.has_errors(),
            "unexpected errors: {:?}",
            messages(&diagnostics)
        );
        let shown: Vec<String> = stmts.iter().map(show_stmt).collect();
        assert_eq!(shown, expected);
    }

    #[test]
    fn test_factor_binds_tighter_than_term() {
        let (stmts, _) = parse_src("1 + 2 * 3;");

        match &stmts[..] {
            [Stmt::Expr(Expr::Binary(left, op, right))] => {
                assert_eq!(op.ty, BinaryOpTy::Plus);
                assert_eq!(**left, Expr::Literal(Literal::Number(1.0)));
                match &**right {
                    Expr::Binary(_, op, _) => assert_eq!(op.ty, BinaryOpTy::Star),
                    other => panic!("expected multiplication, found {:?}", other),
                }
            }
            other => panic!("unexpected statements {:?}", other),
        }
    }

    #[test]
    fn test_precedence_table() {
        check_ast(
            "1 - 2 - 3; 8 / 4 * 2; -1 + 2 < 3 == true; a or b and c;",
            &[
                "(- (- 1 2) 3);",
                "(* (/ 8 4) 2);",
                "(== (< (+ (- 1) 2) 3) true);",
                "(or a (and b c));",
            ],
        );
    }

    #[test]
    fn test_comparison_operators() {
        check_ast(
            "a > b; a >= b; a < b; a <= b;",
            &["(> a b);", "(>= a b);", "(< a b);", "(<= a b);"],
        );
    }

    #[test]
    fn test_primary_literals() {
        check_ast(
            "nil; true; false; \"hi\"; 2.5; (x);",
            &["nil;", "true;", "false;", "\"hi\";", "2.5;", "(group x);"],
        );
    }

    #[test]
    fn test_unary_is_right_recursive() {
        check_ast("--x * y;", &["(* (- (- x)) y);"]);
    }

    #[test]
    fn test_grouping_overrides_precedence() {
        check_ast("(1 + 2) * 3;", &["(* (group (+ 1 2)) 3);"]);
    }

    #[test]
    fn test_assignment_is_right_associative() {
        check_ast("a = b = 1 + 2;", &["(= a (= b (+ 1 2)));"]);
    }

    #[test]
    fn test_invalid_assignment_target() {
        let (stmts, diagnostics) = parse_src("1 + a = 2; b;");

        assert_eq!(
            messages(&diagnostics),
            vec!["[line 1] Error at '=': Invalid assignment target."]
        );
        let shown: Vec<String> = stmts.iter().map(show_stmt).collect();
        assert_eq!(shown, vec!["(+ 1 a);", "b;"]);
    }

    #[test]
    fn test_calls() {
        check_ast(
            "f(); g(1, a + 2); h(1)(2, 3)();",
            &[
                "(call f);",
                "(call g 1 (+ a 2));",
                "(call (call (call h 1) 2 3));",
            ],
        );
    }

    #[test]
    fn test_call_records_closing_paren() {
        let (stmts, _) = parse_src("f(1,\n 2\n);");

        match &stmts[..] {
            [Stmt::Expr(Expr::Call(_, loc, args))] => {
                assert_eq!(args.len(), 2);
                assert_eq!(*loc, SourceLocation { line: 3, col: 0 });
            }
            other => panic!("unexpected statements {:?}", other),
        }
    }

    #[test]
    fn test_too_many_arguments() {
        let args = vec!["0"; 300].join(", ");
        let (stmts, diagnostics) = parse_src(&format!("f({});", args));

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics.iter().next().unwrap().message,
            "Can't have more than 255 arguments."
        );
        match &stmts[..] {
            [Stmt::Expr(Expr::Call(callee, _, args))] => {
                assert!(matches!(**callee, Expr::Variable(ref sym) if sym.name == "f"));
                assert_eq!(args.len(), 300);
            }
            other => panic!("unexpected statements {:?}", other),
        }
    }

    #[test]
    fn test_exactly_255_arguments_is_fine() {
        let args = vec!["x"; 255].join(", ");
        let (stmts, diagnostics) = parse_src(&format!("f({});", args));

        assert!(!diagnostics.has_errors());
        assert_eq!(stmts.len(), 1);
    }

    #[test]
    fn test_variable_definitions() {
        check_ast(
            "(Define x = 1 + 2) (Define y)",
            &["(Define x = (+ 1 2))", "(Define y)"],
        );
    }

    #[test]
    fn test_function_definition() {
        check_ast(
            "(Define add(a, b)\n  (Define c = a + b)\n  c;\n)\nadd(1, 2);",
            &["(Define add(a, b) (Define c = (+ a b)) c;)", "(call add 1 2);"],
        );
    }

    #[test]
    fn test_nested_function_definition() {
        check_ast(
            "(Define outer() (Define inner(x) x;) inner;)",
            &["(Define outer() (Define inner(x) x;) inner;)"],
        );
    }

    #[test]
    fn test_function_symbols_keep_positions() {
        let (stmts, _) = parse_src("(Define f(a,\n b) a;)");

        match &stmts[..] {
            [Stmt::FunDecl(fun)] => {
                assert_eq!(
                    fun.name,
                    Symbol {
                        name: "f".into(),
                        line: 1,
                        col: 8
                    }
                );
                assert_eq!(fun.params[1].line, 2);
                assert_eq!(fun.params[1].col, 1);
            }
            other => panic!("unexpected statements {:?}", other),
        }
    }

    #[test]
    fn test_too_many_parameters() {
        let params: Vec<String> = (0..256).map(|i| format!("p{}", i)).collect();
        let (stmts, diagnostics) = parse_src(&format!("(Define f({}) nil;)", params.join(", ")));

        assert_eq!(
            messages(&diagnostics),
            vec!["[line 1] Error at 'p255': Can't have more than 255 parameters."]
        );
        match &stmts[..] {
            [Stmt::FunDecl(fun)] => assert_eq!(fun.params.len(), 256),
            other => panic!("unexpected statements {:?}", other),
        }
    }

    #[test]
    fn test_cond_statement() {
        check_ast(
            "Cond (x > 1) y = 1; 't y = 2;\nCond (ok) f();",
            &[
                "Cond ((> x 1)) (= y 1); 't (= y 2);",
                "Cond (ok) (call f);",
            ],
        );
    }

    #[test]
    fn test_nested_cond_binds_else_to_nearest() {
        check_ast(
            "Cond (a) Cond (b) 1; 't 2;",
            &["Cond (a) Cond (b) 1; 't 2;"],
        );
    }

    #[test]
    fn test_recovers_after_malformed_statement() {
        let (stmts, diagnostics) = parse_src("1 + ;\n2;\n3;");

        assert!(diagnostics.has_errors());
        assert_eq!(
            messages(&diagnostics)[0],
            "[line 1] Error at ';': Expect expression."
        );
        let shown: Vec<String> = stmts.iter().map(show_stmt).collect();
        assert_eq!(shown, vec!["2;", "3;"]);
    }

    #[test]
    fn test_reports_several_errors_in_one_pass() {
        let (stmts, diagnostics) = parse_src("+;\n(Define)\n(Define x = 4)\nCond x;\ny;");

        assert_eq!(
            messages(&diagnostics),
            vec![
                "[line 1] Error at '+': Expect expression.",
                "[line 2] Error at ')': Expect variable or function name after 'Define'.",
                "[line 4] Error at 'x': Expect '(' after 'Cond'.",
            ]
        );
        let shown: Vec<String> = stmts.iter().map(show_stmt).collect();
        assert_eq!(shown, vec!["(Define x = 4)", "y;"]);
    }

    #[test]
    fn test_synchronize_stops_before_cond() {
        let (stmts, diagnostics) = parse_src("a b c Cond (d) e;");

        assert_eq!(
            messages(&diagnostics),
            vec!["[line 1] Error at 'b': Expect ';' after expression."]
        );
        let shown: Vec<String> = stmts.iter().map(show_stmt).collect();
        assert_eq!(shown, vec!["Cond (d) e;"]);
    }

    #[test]
    fn test_recovers_inside_function_body() {
        let (stmts, diagnostics) = parse_src("(Define f() 1 + ; 2;)\n3;");

        assert_eq!(diagnostics.len(), 1);
        let shown: Vec<String> = stmts.iter().map(show_stmt).collect();
        assert_eq!(shown, vec!["(Define f() 2;)", "3;"]);
    }

    #[test]
    fn test_missing_terminator_reported_at_end() {
        let (stmts, diagnostics) = parse_src("1 + 2");

        assert!(stmts.is_empty());
        assert_eq!(
            messages(&diagnostics),
            vec!["[line 1] Error at end: Expect ';' after expression."]
        );
    }

    #[test]
    fn test_unclosed_block() {
        let (stmts, diagnostics) = parse_src("(Define f(a) a;");

        assert!(stmts.is_empty());
        assert_eq!(
            messages(&diagnostics),
            vec!["[line 1] Error at end: Expect ')' after block."]
        );
    }

    #[test]
    fn test_reserved_words_are_not_expressions() {
        let (stmts, diagnostics) = parse_src("car;\nprint 1;\nCons;");

        assert!(stmts.is_empty());
        assert_eq!(
            messages(&diagnostics),
            vec![
                "[line 1] Error at 'car': Expect expression.",
                "[line 2] Error at 'print': Expect expression.",
                "[line 3] Error at 'Cons': Expect expression.",
            ]
        );
    }

    #[test]
    fn test_deep_grouping_is_reported() {
        let depth = 1000;
        let code = format!("{}1{};\n2;", "(".repeat(depth), ")".repeat(depth));
        let (stmts, diagnostics) = parse_src(&code);

        assert_eq!(
            messages(&diagnostics),
            vec!["[line 1] Error at '(': Nesting too deep."]
        );
        let shown: Vec<String> = stmts.iter().map(show_stmt).collect();
        assert_eq!(shown, vec!["2;"]);
    }

    #[test]
    fn test_grouping_at_nesting_limit() {
        let depth = super::MAX_DEPTH;
        let code = format!("{}1{};", "(".repeat(depth), ")".repeat(depth));
        let (stmts, diagnostics) = parse_src(&code);

        assert!(!diagnostics.has_errors());
        assert_eq!(stmts.len(), 1);
    }

    #[test]
    fn test_long_negation_chain_is_reported() {
        let code = format!("{}1;", "-".repeat(5000));
        let (stmts, diagnostics) = parse_src(&code);

        assert!(stmts.is_empty());
        assert_eq!(
            messages(&diagnostics),
            vec!["[line 1] Error at '-': Nesting too deep."]
        );
    }

    #[test]
    fn test_long_cond_chain_is_reported() {
        let code = format!("{}y;", "Cond (x) ".repeat(100));
        let (stmts, diagnostics) = parse_src(&code);

        assert_eq!(
            messages(&diagnostics),
            vec!["[line 1] Error at 'Cond': Nesting too deep."]
        );
        // parsing resumes at the next Cond, leaving a shorter chain
        assert_eq!(stmts.len(), 1);
        assert!(matches!(stmts[0], Stmt::Cond(..)));
    }

    #[test]
    fn test_deeply_nested_definitions_are_reported() {
        let depth = 70;
        let opens: String = (0..depth).map(|i| format!("(Define f{}() ", i)).collect();
        let code = format!("{}{}", opens, ")".repeat(depth));
        let (stmts, diagnostics) = parse_src(&code);

        assert!(stmts.is_empty());
        assert_eq!(
            messages(&diagnostics)[0],
            "[line 1] Error at ')': Nesting too deep."
        );
    }

    #[test]
    fn test_parsing_is_deterministic() {
        let mut diagnostics = Diagnostics::default();
        let tokens = scanner::scan_tokens(
            "(Define fib(n) Cond (n < 2) n; 't fib(n - 1) + fib(n - 2);)\nfib(10);",
            &mut diagnostics,
        );

        let first = parser::parse(tokens.clone(), &mut diagnostics);
        let second = parser::parse(tokens, &mut diagnostics);

        assert!(!diagnostics.has_errors());
        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_token_stream() {
        let mut diagnostics = Diagnostics::default();

        assert!(parser::parse(Vec::new(), &mut diagnostics).is_empty());
        assert!(!diagnostics.has_errors());
    }
}
