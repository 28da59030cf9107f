//! Hand-written lexer for C99 source.
//!
//! Produces a flat token stream with source positions. Preprocessor line
//! markers (`# 42 "file.c"`) are consumed and fold into the positions of
//! the tokens that follow, so lexing `cc -E` output reports positions in
//! the original files.

use std::error::Error;
use std::fmt;

use crate::ast::Pos;

/// C99 keywords. `Ident` tokens are looked up against this table before
/// being emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Auto,
    Break,
    Case,
    Char,
    Const,
    Continue,
    Default,
    Do,
    Double,
    Else,
    Enum,
    Extern,
    Float,
    For,
    Goto,
    If,
    Inline,
    Int,
    Long,
    Register,
    Restrict,
    Return,
    Short,
    Signed,
    Sizeof,
    Static,
    Struct,
    Switch,
    Typedef,
    Union,
    Unsigned,
    Void,
    Volatile,
    While,
    Bool,
    Complex,
    Imaginary,
}

impl Keyword {
    fn lookup(word: &str) -> Option<Keyword> {
        use Keyword::*;
        Some(match word {
            "auto" => Auto,
            "break" => Break,
            "case" => Case,
            "char" => Char,
            "const" => Const,
            "continue" => Continue,
            "default" => Default,
            "do" => Do,
            "double" => Double,
            "else" => Else,
            "enum" => Enum,
            "extern" => Extern,
            "float" => Float,
            "for" => For,
            "goto" => Goto,
            "if" => If,
            "inline" => Inline,
            "int" => Int,
            "long" => Long,
            "register" => Register,
            "restrict" => Restrict,
            "return" => Return,
            "short" => Short,
            "signed" => Signed,
            "sizeof" => Sizeof,
            "static" => Static,
            "struct" => Struct,
            "switch" => Switch,
            "typedef" => Typedef,
            "union" => Union,
            "unsigned" => Unsigned,
            "void" => Void,
            "volatile" => Volatile,
            "while" => While,
            "_Bool" => Bool,
            "_Complex" => Complex,
            "_Imaginary" => Imaginary,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Kw(Keyword),
    /// Integer constant; `format` is one of `dec`, `hex`, `oct` and
    /// `suffix` the literal suffix characters, if any.
    IntLit {
        val: i64,
        format: &'static str,
        suffix: Option<String>,
    },
    FloatLit {
        val: f64,
        suffix: Option<String>,
    },
    /// Character constant; `val` is the source text between the quotes,
    /// escapes untouched.
    CharLit {
        val: String,
        wide: bool,
    },
    /// String literal; `val` is the source text between the quotes.
    StrLit {
        val: String,
        wide: bool,
    },

    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semi,
    Comma,
    Colon,
    Question,
    Ellipsis,
    Dot,
    Arrow,
    Inc,
    Dec,
    Amp,
    Star,
    Plus,
    Minus,
    Tilde,
    Bang,
    Slash,
    Percent,
    Shl,
    Shr,
    Lt,
    Gt,
    Le,
    Ge,
    EqEq,
    Ne,
    Caret,
    Pipe,
    AndAnd,
    OrOr,
    Assign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    PlusAssign,
    MinusAssign,
    ShlAssign,
    ShrAssign,
    AmpAssign,
    CaretAssign,
    PipeAssign,

    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TokenKind::*;
        match self {
            Ident(name) => write!(f, "identifier `{}`", name),
            Kw(kw) => write!(f, "`{:?}`", kw),
            IntLit { val, .. } => write!(f, "integer constant `{}`", val),
            FloatLit { val, .. } => write!(f, "floating constant `{}`", val),
            CharLit { val, .. } => write!(f, "character constant '{}'", val),
            StrLit { val, .. } => write!(f, "string literal \"{}\"", val),
            LParen => f.write_str("`(`"),
            RParen => f.write_str("`)`"),
            LBrace => f.write_str("`{`"),
            RBrace => f.write_str("`}`"),
            LBracket => f.write_str("`[`"),
            RBracket => f.write_str("`]`"),
            Semi => f.write_str("`;`"),
            Comma => f.write_str("`,`"),
            Colon => f.write_str("`:`"),
            Question => f.write_str("`?`"),
            Ellipsis => f.write_str("`...`"),
            Dot => f.write_str("`.`"),
            Arrow => f.write_str("`->`"),
            Inc => f.write_str("`++`"),
            Dec => f.write_str("`--`"),
            Amp => f.write_str("`&`"),
            Star => f.write_str("`*`"),
            Plus => f.write_str("`+`"),
            Minus => f.write_str("`-`"),
            Tilde => f.write_str("`~`"),
            Bang => f.write_str("`!`"),
            Slash => f.write_str("`/`"),
            Percent => f.write_str("`%`"),
            Shl => f.write_str("`<<`"),
            Shr => f.write_str("`>>`"),
            Lt => f.write_str("`<`"),
            Gt => f.write_str("`>`"),
            Le => f.write_str("`<=`"),
            Ge => f.write_str("`>=`"),
            EqEq => f.write_str("`==`"),
            Ne => f.write_str("`!=`"),
            Caret => f.write_str("`^`"),
            Pipe => f.write_str("`|`"),
            AndAnd => f.write_str("`&&`"),
            OrOr => f.write_str("`||`"),
            Assign => f.write_str("`=`"),
            StarAssign => f.write_str("`*=`"),
            SlashAssign => f.write_str("`/=`"),
            PercentAssign => f.write_str("`%=`"),
            PlusAssign => f.write_str("`+=`"),
            MinusAssign => f.write_str("`-=`"),
            ShlAssign => f.write_str("`<<=`"),
            ShrAssign => f.write_str("`>>=`"),
            AmpAssign => f.write_str("`&=`"),
            CaretAssign => f.write_str("`^=`"),
            PipeAssign => f.write_str("`|=`"),
            Eof => f.write_str("end of input"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub message: String,
    pub pos: Pos,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.pos, self.message)
    }
}

impl Error for LexError {}

pub struct Lexer<'a> {
    src: &'a [u8],
    at: usize,
    filename: Option<String>,
    line: u32,
    col: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str, filename: Option<&str>) -> Self {
        Lexer {
            src: src.as_bytes(),
            at: 0,
            filename: filename.map(str::to_owned),
            line: 1,
            col: 1,
        }
    }

    /// Lexes the whole input, ending with an `Eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn pos(&self) -> Pos {
        Pos::new(self.filename.as_deref(), self.line, self.col)
    }

    fn error(&self, message: impl Into<String>) -> LexError {
        LexError {
            message: message.into(),
            pos: self.pos(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.at).copied()
    }

    fn peek2(&self) -> Option<u8> {
        self.src.get(self.at + 1).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.at += 1;
        if c == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn eat(&mut self, c: u8) -> bool {
        if self.peek() == Some(c) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(c) if (c as char).is_ascii_whitespace() => {
                    self.bump();
                }
                Some(b'/') if self.peek2() == Some(b'/') => {
                    while let Some(c) = self.peek() {
                        if c == b'\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                Some(b'/') if self.peek2() == Some(b'*') => {
                    let start = self.pos();
                    self.bump();
                    self.bump();
                    loop {
                        match self.peek() {
                            Some(b'*') if self.peek2() == Some(b'/') => {
                                self.bump();
                                self.bump();
                                break;
                            }
                            Some(_) => {
                                self.bump();
                            }
                            None => {
                                return Err(LexError {
                                    message: "unterminated comment".to_owned(),
                                    pos: start,
                                })
                            }
                        }
                    }
                }
                Some(b'#') if self.col == 1 => self.line_marker()?,
                _ => return Ok(()),
            }
        }
    }

    /// Consumes a `# <line> "<file>"` marker left behind by the
    /// preprocessor and resets the position accordingly.
    fn line_marker(&mut self) -> Result<(), LexError> {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c == b'\n' {
                break;
            }
            text.push(c as char);
            self.bump();
        }
        self.bump();
        let mut parts = text[1..].split_whitespace();
        let line: u32 = match parts.next().and_then(|p| p.parse().ok()) {
            Some(n) => n,
            // `#pragma` and friends pass through cc -E; ignore them
            None => return Ok(()),
        };
        if let Some(file) = parts.next() {
            self.filename = Some(file.trim_matches('"').to_owned());
        }
        self.line = line;
        self.col = 1;
        Ok(())
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_trivia()?;
        let pos = self.pos();
        let kind = match self.peek() {
            None => TokenKind::Eof,
            Some(c) if c == b'_' || (c as char).is_ascii_alphabetic() => self.word()?,
            Some(c) if (c as char).is_ascii_digit() => self.number()?,
            Some(b'.') if self.peek2().is_some_and(|c| (c as char).is_ascii_digit()) => {
                self.number()?
            }
            Some(b'\'') => self.char_lit(false)?,
            Some(b'"') => self.string_lit(false)?,
            Some(_) => self.punct()?,
        };
        Ok(Token { kind, pos })
    }

    fn word(&mut self) -> Result<TokenKind, LexError> {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c == b'_' || (c as char).is_ascii_alphanumeric() {
                name.push(c as char);
                self.bump();
            } else {
                break;
            }
        }
        // L'x' and L"s" are wide literals, not identifiers
        if name == "L" {
            if self.peek() == Some(b'\'') {
                return self.char_lit(true);
            }
            if self.peek() == Some(b'"') {
                return self.string_lit(true);
            }
        }
        Ok(match Keyword::lookup(&name) {
            Some(kw) => TokenKind::Kw(kw),
            None => TokenKind::Ident(name),
        })
    }

    fn number(&mut self) -> Result<TokenKind, LexError> {
        let start = self.at;
        let mut is_float = false;
        let hex = self.peek() == Some(b'0')
            && matches!(self.peek2(), Some(b'x') | Some(b'X'));
        if hex {
            self.bump();
            self.bump();
            while self
                .peek()
                .is_some_and(|c| (c as char).is_ascii_hexdigit())
            {
                self.bump();
            }
        } else {
            while let Some(c) = self.peek() {
                match c {
                    b'0'..=b'9' => {
                        self.bump();
                    }
                    b'.' => {
                        is_float = true;
                        self.bump();
                    }
                    b'e' | b'E' => {
                        is_float = true;
                        self.bump();
                        if matches!(self.peek(), Some(b'+') | Some(b'-')) {
                            self.bump();
                        }
                    }
                    _ => break,
                }
            }
        }
        let digits = std::str::from_utf8(&self.src[start..self.at])
            .unwrap()
            .to_owned();

        let mut suffix = String::new();
        while self
            .peek()
            .is_some_and(|c| matches!(c, b'u' | b'U' | b'l' | b'L' | b'f' | b'F'))
        {
            suffix.push(self.peek().unwrap() as char);
            self.bump();
        }
        if suffix.contains(['f', 'F']) {
            is_float = true;
        }
        let suffix = if suffix.is_empty() { None } else { Some(suffix) };

        if is_float {
            let val: f64 = digits
                .parse()
                .map_err(|_| self.error(format!("bad floating constant `{}`", digits)))?;
            return Ok(TokenKind::FloatLit { val, suffix });
        }
        let (val, format) = if hex {
            let parsed = i64::from_str_radix(&digits[2..], 16)
                .map_err(|_| self.error(format!("bad integer constant `{}`", digits)))?;
            (parsed, "hex")
        } else if digits.len() > 1 && digits.starts_with('0') {
            let parsed = i64::from_str_radix(&digits[1..], 8)
                .map_err(|_| self.error(format!("bad integer constant `{}`", digits)))?;
            (parsed, "oct")
        } else {
            let parsed: i64 = digits
                .parse()
                .map_err(|_| self.error(format!("bad integer constant `{}`", digits)))?;
            (parsed, "dec")
        };
        Ok(TokenKind::IntLit { val, format, suffix })
    }

    /// Reads the raw text between quotes, leaving escape sequences as
    /// written so the literal round-trips through the renderer.
    fn quoted(&mut self, quote: u8) -> Result<String, LexError> {
        self.bump();
        let mut val = String::new();
        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    return Err(self.error(format!(
                        "unterminated {} literal",
                        if quote == b'"' { "string" } else { "character" }
                    )))
                }
                Some(c) if c == quote => {
                    self.bump();
                    return Ok(val);
                }
                Some(b'\\') => {
                    val.push('\\');
                    self.bump();
                    if let Some(c) = self.bump() {
                        val.push(c as char);
                    }
                }
                Some(c) => {
                    val.push(c as char);
                    self.bump();
                }
            }
        }
    }

    fn char_lit(&mut self, wide: bool) -> Result<TokenKind, LexError> {
        let val = self.quoted(b'\'')?;
        Ok(TokenKind::CharLit { val, wide })
    }

    fn string_lit(&mut self, wide: bool) -> Result<TokenKind, LexError> {
        let val = self.quoted(b'"')?;
        Ok(TokenKind::StrLit { val, wide })
    }

    fn punct(&mut self) -> Result<TokenKind, LexError> {
        use TokenKind::*;
        let c = self.bump().unwrap();
        Ok(match c {
            b'(' => LParen,
            b')' => RParen,
            b'{' => LBrace,
            b'}' => RBrace,
            b'[' => LBracket,
            b']' => RBracket,
            b';' => Semi,
            b',' => Comma,
            b'?' => Question,
            b'~' => Tilde,
            b':' => Colon,
            b'.' => {
                if self.peek() == Some(b'.') && self.peek2() == Some(b'.') {
                    self.bump();
                    self.bump();
                    Ellipsis
                } else {
                    Dot
                }
            }
            b'+' => {
                if self.eat(b'+') {
                    Inc
                } else if self.eat(b'=') {
                    PlusAssign
                } else {
                    Plus
                }
            }
            b'-' => {
                if self.eat(b'-') {
                    Dec
                } else if self.eat(b'=') {
                    MinusAssign
                } else if self.eat(b'>') {
                    Arrow
                } else {
                    Minus
                }
            }
            b'*' => {
                if self.eat(b'=') {
                    StarAssign
                } else {
                    Star
                }
            }
            b'/' => {
                if self.eat(b'=') {
                    SlashAssign
                } else {
                    Slash
                }
            }
            b'%' => {
                if self.eat(b'=') {
                    PercentAssign
                } else {
                    Percent
                }
            }
            b'&' => {
                if self.eat(b'&') {
                    AndAnd
                } else if self.eat(b'=') {
                    AmpAssign
                } else {
                    Amp
                }
            }
            b'|' => {
                if self.eat(b'|') {
                    OrOr
                } else if self.eat(b'=') {
                    PipeAssign
                } else {
                    Pipe
                }
            }
            b'^' => {
                if self.eat(b'=') {
                    CaretAssign
                } else {
                    Caret
                }
            }
            b'!' => {
                if self.eat(b'=') {
                    Ne
                } else {
                    Bang
                }
            }
            b'=' => {
                if self.eat(b'=') {
                    EqEq
                } else {
                    Assign
                }
            }
            b'<' => {
                if self.eat(b'<') {
                    if self.eat(b'=') {
                        ShlAssign
                    } else {
                        Shl
                    }
                } else if self.eat(b'=') {
                    Le
                } else {
                    Lt
                }
            }
            b'>' => {
                if self.eat(b'>') {
                    if self.eat(b'=') {
                        ShrAssign
                    } else {
                        Shr
                    }
                } else if self.eat(b'=') {
                    Ge
                } else {
                    Gt
                }
            }
            other => {
                return Err(self.error(format!("stray `{}` in program", other as char)))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src, None)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("int x"),
            [
                TokenKind::Kw(Keyword::Int),
                TokenKind::Ident("x".to_owned()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_integer_formats() {
        assert_eq!(
            kinds("10 0x1f 010"),
            [
                TokenKind::IntLit { val: 10, format: "dec", suffix: None },
                TokenKind::IntLit { val: 31, format: "hex", suffix: None },
                TokenKind::IntLit { val: 8, format: "oct", suffix: None },
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_suffixes_and_floats() {
        assert_eq!(
            kinds("1UL 2.5 1e3"),
            [
                TokenKind::IntLit {
                    val: 1,
                    format: "dec",
                    suffix: Some("UL".to_owned())
                },
                TokenKind::FloatLit { val: 2.5, suffix: None },
                TokenKind::FloatLit { val: 1000.0, suffix: None },
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_keeps_escapes_raw() {
        assert_eq!(
            kinds(r#""a\nb""#),
            [
                TokenKind::StrLit { val: "a\\nb".to_owned(), wide: false },
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_wide_literals() {
        assert_eq!(
            kinds("L'x' L\"s\" Lx"),
            [
                TokenKind::CharLit { val: "x".to_owned(), wide: true },
                TokenKind::StrLit { val: "s".to_owned(), wide: true },
                TokenKind::Ident("Lx".to_owned()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_three_char_operators() {
        assert_eq!(
            kinds("a <<= b >>= c ..."),
            [
                TokenKind::Ident("a".to_owned()),
                TokenKind::ShlAssign,
                TokenKind::Ident("b".to_owned()),
                TokenKind::ShrAssign,
                TokenKind::Ident("c".to_owned()),
                TokenKind::Ellipsis,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_line_marker_resets_position() {
        let tokens = Lexer::new("# 7 \"lib.c\"\nx", None).tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Ident("x".to_owned()));
        assert_eq!(tokens[0].pos.to_string(), "lib.c:7:1");
    }

    #[test]
    fn test_comments_are_trivia() {
        assert_eq!(
            kinds("a /* b */ c // d\ne"),
            [
                TokenKind::Ident("a".to_owned()),
                TokenKind::Ident("c".to_owned()),
                TokenKind::Ident("e".to_owned()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_string_errors() {
        let err = Lexer::new("\"abc", None).tokenize().unwrap_err();
        assert!(err.message.contains("unterminated"));
    }
}
