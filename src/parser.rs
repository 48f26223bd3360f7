/*!
Recursive‑descent parser turning a token stream into [`Expr`] trees.

Whitespace tokens are dropped up front; every remaining token is consumed
exactly once, so parsing is Θ(n) in the number of tokens.  Recursion depth
grows with the bracket nesting of the source; each level runs under
[`ensure_sufficient_stack`].

Grammar
-------

```text
program   → form* EOF ;
form      → atom | list | array | block ;
array     → "[" form* "]" ;
block     → "{" … "}" ;                       (reserved, evaluates to an internal fault)
list      → "(" "class" IDENT params ")"
          | "(" "<3" IDENT params form ")"
          | "(" "do" form* ")"
          | "(" "if" form form form? ")"
          | "(" "or" form* ")"
          | "(" "and" form* ")"
          | "(" "let" IDENT form form ")"
          | "(" "fn" params form ")"
          | "(" IDENT form* ")"                 (named call)
          | "(" form form* ")" ;                (call)
params    → "[" IDENT* "]" ;
atom      → INT | FLOAT | STRING | "true" | "false" | "nil" | IDENT ;
```

Logging: `info` on construction, `debug` when descending into a special form.
*/

use log::{debug, info};
use phf::phf_map;

use crate::ast::{Expr, Lambda};
use crate::error::{LangError, Result};
use crate::stack::ensure_sufficient_stack;
use crate::token::{Tag, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    Class,
    Do,
    If,
    Or,
    And,
    Let,
    Fn,
    True,
    False,
    Nil,
}

static KEYWORDS: phf::Map<&'static str, Keyword> = phf_map! {
    "class" => Keyword::Class,
    "do"    => Keyword::Do,
    "if"    => Keyword::If,
    "or"    => Keyword::Or,
    "and"   => Keyword::And,
    "let"   => Keyword::Let,
    "fn"    => Keyword::Fn,
    "true"  => Keyword::True,
    "false" => Keyword::False,
    "nil"   => Keyword::Nil,
};

/// Top‑level parser over the significant tokens of one source text.
pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    current: usize,
}

impl<'a> Parser<'a> {
    /// Construct a new parser.  Accepts any token source: a `Vec`, a
    /// [`Scanner`](crate::scanner::Scanner) or the receiving end of
    /// [`stream_tokens`](crate::scanner::stream_tokens).
    pub fn new<I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = Token<'a>>,
    {
        let mut tokens: Vec<Token<'a>> = tokens.into_iter().filter(|t| !t.is_trivia()).collect();

        if tokens.last().map(|t| t.tag) != Some(Tag::EndOfInput) {
            tokens.push(Token::new(Tag::EndOfInput, ""));
        }

        info!("Parser created with {} tokens", tokens.len());

        Self { tokens, current: 0 }
    }

    // ───────────────────────── public API ─────────────────────────

    /// Parse an entire program and return its top‑level forms.
    pub fn parse(&mut self) -> Result<Vec<Expr>> {
        info!("Beginning parse phase");

        let mut forms: Vec<Expr> = Vec::new();

        while !self.is_at_end() {
            forms.push(self.form()?);
        }

        Ok(forms)
    }

    // ───────────────────────── forms ─────────────────────────

    fn form(&mut self) -> Result<Expr> {
        ensure_sufficient_stack(|| self.single_form())
    }

    fn single_form(&mut self) -> Result<Expr> {
        let token: Token<'a> = self.advance();

        match token.tag {
            Tag::ParenOpen => self.list(),
            Tag::BracketOpen => Ok(Expr::ArrayLiteral(self.forms_until(Tag::BracketClose)?)),
            Tag::CurlyOpen => self.block(),
            Tag::Int => token
                .span
                .parse::<i64>()
                .map(Expr::IntLiteral)
                .map_err(|e| self.error(format!("invalid integer {}: {}", token.span, e))),
            Tag::Float => token
                .span
                .parse::<f64>()
                .map(Expr::FloatLiteral)
                .map_err(|e| self.error(format!("invalid float {}: {}", token.span, e))),
            Tag::String => self.string(token.span).map(Expr::StringLiteral),
            Tag::Identifier => match KEYWORDS.get(token.span) {
                None => Ok(Expr::IdentLiteral(token.span.to_string())),
                Some(Keyword::True) => Ok(Expr::BoolLiteral(true)),
                Some(Keyword::False) => Ok(Expr::BoolLiteral(false)),
                Some(Keyword::Nil) => Ok(Expr::NilLiteral),
                Some(_) => Err(self.error(format!(
                    "'{}' is a special form and cannot be used as a value",
                    token.span
                ))),
            },
            Tag::Heart => Err(self.error("'<3' may only start a function definition")),
            Tag::EndOfInput => Err(self.error("unexpected end of input")),
            Tag::ParenClose | Tag::BracketClose | Tag::CurlyClose => {
                Err(self.error(format!("unexpected '{}'", token.span)))
            }
            Tag::Whitespace => unreachable!("whitespace is filtered in Parser::new"),
        }
    }

    /// Everything after an opening `(`.
    fn list(&mut self) -> Result<Expr> {
        let head: Token<'a> = self.peek();

        match head.tag {
            Tag::ParenClose => Err(self.error("empty form '()'")),

            Tag::Heart => {
                self.advance();
                self.function_definition()
            }

            Tag::Identifier => match KEYWORDS.get(head.span).copied() {
                None => {
                    self.advance();
                    let arguments: Vec<Expr> = self.forms_until(Tag::ParenClose)?;
                    Ok(Expr::NamedCall {
                        function: head.span.to_string(),
                        arguments,
                    })
                }
                Some(Keyword::True | Keyword::False | Keyword::Nil) => self.call(),
                Some(keyword) => {
                    self.advance();
                    self.special_form(keyword)
                }
            },

            _ => self.call(),
        }
    }

    fn special_form(&mut self, keyword: Keyword) -> Result<Expr> {
        debug!("Parsing special form {:?}", keyword);

        match keyword {
            Keyword::Class => {
                let name: String = self.identifier("expected class name")?;
                let fields: Vec<String> = self.params()?;
                self.consume(Tag::ParenClose, "expected ')' after class fields")?;
                Ok(Expr::ClassDefinition { name, fields })
            }

            Keyword::Do => Ok(Expr::DoFlow(self.forms_until(Tag::ParenClose)?)),

            Keyword::If => {
                let condition: Expr = self.form()?;
                let then_branch: Expr = self.form()?;
                let else_branch: Expr = if self.check(Tag::ParenClose) {
                    Expr::NilLiteral
                } else {
                    self.form()?
                };
                self.consume(Tag::ParenClose, "expected ')' after if branches")?;
                Ok(Expr::IfFlow {
                    condition: Box::new(condition),
                    then_branch: Box::new(then_branch),
                    else_branch: Box::new(else_branch),
                })
            }

            Keyword::Or => Ok(Expr::OrFlow(self.forms_until(Tag::ParenClose)?)),

            Keyword::And => Ok(Expr::AndFlow(self.forms_until(Tag::ParenClose)?)),

            Keyword::Let => {
                let ident: String = self.identifier("expected variable name after 'let'")?;
                let value: Expr = self.form()?;
                let body: Expr = self.form()?;
                self.consume(Tag::ParenClose, "expected ')' after let body")?;
                Ok(Expr::VariableDefinition {
                    ident,
                    value: Box::new(value),
                    body: Box::new(body),
                })
            }

            Keyword::Fn => {
                let params: Vec<String> = self.params()?;
                let body: Expr = self.form()?;
                self.consume(Tag::ParenClose, "expected ')' after lambda body")?;
                Ok(Expr::LambdaLiteral(Lambda::new(params, body)))
            }

            Keyword::True | Keyword::False | Keyword::Nil => {
                unreachable!("literal keywords are parsed as call heads")
            }
        }
    }

    fn function_definition(&mut self) -> Result<Expr> {
        let name: String = self.identifier("expected function name after '<3'")?;
        let params: Vec<String> = self.params()?;
        let body: Expr = self.form()?;
        self.consume(Tag::ParenClose, "expected ')' after function body")?;

        debug!("Parsed function definition '{}'", name);

        Ok(Expr::FunctionDefinition {
            name,
            function: Lambda::new(params, body),
        })
    }

    /// `(<expr> args...)` where the head is not a plain identifier.
    fn call(&mut self) -> Result<Expr> {
        let function: Expr = self.form()?;
        let arguments: Vec<Expr> = self.forms_until(Tag::ParenClose)?;

        Ok(Expr::Call {
            function: Box::new(function),
            arguments,
        })
    }

    /// Skip a balanced `{ … }` group, keeping its text for diagnostics.
    fn block(&mut self) -> Result<Expr> {
        let mut depth: usize = 1;
        let mut parts: Vec<&str> = vec!["{"];

        while depth > 0 {
            if self.is_at_end() {
                return Err(self.error("unterminated '{'"));
            }

            let token: Token<'a> = self.advance();
            match token.tag {
                Tag::CurlyOpen => depth += 1,
                Tag::CurlyClose => depth -= 1,
                _ => {}
            }
            parts.push(token.span);
        }

        Ok(Expr::Unsupported {
            form: parts.join(" "),
        })
    }

    // ────────────────────── building blocks ───────────────────────

    /// Parse forms until `close`, consuming it.
    fn forms_until(&mut self, close: Tag) -> Result<Vec<Expr>> {
        let mut forms: Vec<Expr> = Vec::new();

        while !self.check(close) {
            if self.is_at_end() {
                return Err(self.error(format!("expected {} before end of input", close.name())));
            }
            forms.push(self.form()?);
        }

        self.advance();

        Ok(forms)
    }

    /// `[ident ...]`
    fn params(&mut self) -> Result<Vec<String>> {
        self.consume(Tag::BracketOpen, "expected '[' to start a parameter list")?;

        let mut params: Vec<String> = Vec::new();
        while !self.check(Tag::BracketClose) {
            params.push(self.identifier("expected parameter name")?);
        }

        self.advance();

        Ok(params)
    }

    fn identifier(&mut self, message: &str) -> Result<String> {
        let token: Token<'a> = self.peek();

        if token.tag == Tag::Identifier && !KEYWORDS.contains_key(token.span) {
            self.advance();
            return Ok(token.span.to_string());
        }

        Err(self.error(message))
    }

    /// Decode a string span, quotes included.
    fn string(&self, span: &str) -> Result<String> {
        let mut out: String = String::with_capacity(span.len());
        let mut chars = span.chars().skip(1);

        while let Some(c) = chars.next() {
            match c {
                '"' => return Ok(out),
                '\\' => match chars.next() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(other) => out.push(other),
                    None => break,
                },
                other => out.push(other),
            }
        }

        Err(self.error("unterminated string"))
    }

    // ────────────────────── utility helpers ───────────────────────

    #[inline(always)]
    fn consume(&mut self, tag: Tag, message: &str) -> Result<Token<'a>> {
        if self.check(tag) {
            return Ok(self.advance());
        }

        Err(self.error(message))
    }

    #[inline(always)]
    fn check(&self, tag: Tag) -> bool {
        self.peek().tag == tag
    }

    #[inline(always)]
    fn advance(&mut self) -> Token<'a> {
        let token: Token<'a> = self.peek();

        if !self.is_at_end() {
            self.current += 1;
        }

        token
    }

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.peek().tag == Tag::EndOfInput
    }

    #[inline(always)]
    fn peek(&self) -> Token<'a> {
        self.tokens[self.current]
    }

    fn error<S: Into<String>>(&self, message: S) -> LangError {
        debug!("Parse error at token {}", self.current);

        LangError::parse(self.current, message)
    }
}
