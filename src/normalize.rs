//! Type spelling normalization
//!
//! Code annotations and docstrings spell the same type in many ways
//! (`Optional[str]`, `str | None`, `typing.Optional[String]`, `str or None`).
//! [`normalize`] maps all of them to one canonical string so that mismatch
//! detection can use plain string equality.
//!
//! Spellings are parsed into a small [`TypeExpr`] tree first, so nested
//! brackets are handled structurally. Text that does not parse as a type
//! expression goes through a flat textual pipeline instead.

use once_cell::sync::Lazy;
use regex::Regex;

/// Module prefixes that carry no meaning for comparison
const QUALIFIER_PREFIXES: &[&str] = &["typing_extensions.", "typing.", "collections.abc."];

/// Prose and legacy spellings mapped to their canonical builtin name
const TYPE_ALIASES: &[(&str, &str)] = &[
    ("string", "str"),
    ("integer", "int"),
    ("boolean", "bool"),
    ("dictionary", "dict"),
    ("unicode", "str"),
    ("long", "int"),
    ("nonetype", "none"),
];

static QUALIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:typing_extensions|typing|collections\.abc)\.").unwrap());
static OPTIONAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\boptional\[([^\[\]]+)\]").unwrap());
static UNION_SPACING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\|\s*").unwrap());
static ALIAS_RE: Lazy<Regex> = Lazy::new(|| {
    let words: Vec<&str> = TYPE_ALIASES.iter().map(|(from, _)| *from).collect();
    Regex::new(&format!(r"\b(?:{})\b", words.join("|"))).unwrap()
});

/// A parsed type expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// A plain name such as `int`, `none` or `...`
    Name(String),
    /// A subscripted type such as `dict[str, int]`
    Generic(String, Vec<TypeExpr>),
    /// A bare bracketed list, as in the parameter list of `callable[[int], str]`
    List(Vec<TypeExpr>),
    /// Alternatives, flattened and without duplicates
    Union(Vec<TypeExpr>),
}

impl TypeExpr {
    /// Parse a type spelling. Returns `None` if the text is not a well-formed
    /// type expression.
    pub fn parse(text: &str) -> Option<TypeExpr> {
        let tokens = tokenize(&text.to_lowercase())?;
        let mut parser = Parser { tokens, pos: 0 };
        let expr = parser.union()?;
        if parser.pos != parser.tokens.len() {
            return None;
        }
        Some(expr)
    }

    /// Canonical form: qualifiers stripped, aliases applied, `Optional` and
    /// `Union` lowered to [`TypeExpr::Union`]
    pub fn canonical(self) -> TypeExpr {
        match self {
            TypeExpr::Name(name) => TypeExpr::Name(canonical_name(&name)),
            TypeExpr::Generic(name, args) => {
                let name = canonical_name(&name);
                let args: Vec<TypeExpr> = args.into_iter().map(TypeExpr::canonical).collect();
                match name.as_str() {
                    "optional" if args.len() == 1 => {
                        let mut members = args;
                        members.push(TypeExpr::Name("none".to_string()));
                        make_union(members)
                    }
                    "union" if !args.is_empty() => make_union(args),
                    _ => TypeExpr::Generic(name, args),
                }
            }
            TypeExpr::List(items) => {
                TypeExpr::List(items.into_iter().map(TypeExpr::canonical).collect())
            }
            TypeExpr::Union(members) => {
                make_union(members.into_iter().map(TypeExpr::canonical).collect())
            }
        }
    }
}

impl std::fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeExpr::Name(name) => write!(f, "{}", name),
            TypeExpr::Generic(name, args) => write!(f, "{}[{}]", name, join(args, ", ")),
            TypeExpr::List(items) => write!(f, "[{}]", join(items, ", ")),
            TypeExpr::Union(members) => write!(f, "{}", join(members, "|")),
        }
    }
}

fn join(items: &[TypeExpr], separator: &str) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(separator)
}

fn canonical_name(name: &str) -> String {
    let mut stripped = name;
    for prefix in QUALIFIER_PREFIXES {
        if let Some(rest) = stripped.strip_prefix(prefix) {
            stripped = rest;
            break;
        }
    }
    TYPE_ALIASES
        .iter()
        .find(|(from, _)| *from == stripped)
        .map(|(_, to)| to.to_string())
        .unwrap_or_else(|| stripped.to_string())
}

fn make_union(members: Vec<TypeExpr>) -> TypeExpr {
    let mut flat: Vec<TypeExpr> = Vec::new();
    for member in members {
        let nested = match member {
            TypeExpr::Union(inner) => inner,
            other => vec![other],
        };
        for item in nested {
            if !flat.contains(&item) {
                flat.push(item);
            }
        }
    }
    if flat.len() == 1 {
        flat.remove(0)
    } else {
        TypeExpr::Union(flat)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    LBracket,
    RBracket,
    Comma,
    Pipe,
}

fn tokenize(text: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '[' => {
                chars.next();
                tokens.push(Token::LBracket);
            }
            ']' => {
                chars.next();
                tokens.push(Token::RBracket);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            '|' => {
                chars.next();
                tokens.push(Token::Pipe);
            }
            '\'' | '"' => {
                // Forward references and Literal[...] values compare by content
                let quote = c;
                chars.next();
                let mut literal = String::new();
                loop {
                    match chars.next() {
                        Some(ch) if ch == quote => break,
                        Some(ch) => literal.push(ch),
                        None => return None,
                    }
                }
                tokens.push(Token::Ident(literal.trim().to_string()));
            }
            c if is_ident_char(c) => {
                let mut ident = String::new();
                while let Some(&ch) = chars.peek() {
                    if !is_ident_char(ch) {
                        break;
                    }
                    ident.push(ch);
                    chars.next();
                }
                tokens.push(Token::Ident(ident));
            }
            _ => return None,
        }
    }

    Some(tokens)
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.' || c == '-'
}

/// Recursive-descent parser over [`Token`]s
///
/// ```text
/// union   := primary (("|" | "or") primary)*
/// primary := IDENT ("[" args "]")? | "[" args? "]"
/// args    := union ("," union)* ","?
/// ```
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn union(&mut self) -> Option<TypeExpr> {
        let mut members = vec![self.primary()?];
        loop {
            let is_separator = match self.peek() {
                Some(Token::Pipe) => true,
                Some(Token::Ident(word)) => word == "or",
                _ => false,
            };
            if !is_separator {
                break;
            }
            self.pos += 1;
            members.push(self.primary()?);
        }
        if members.len() == 1 {
            members.pop()
        } else {
            Some(TypeExpr::Union(members))
        }
    }

    fn primary(&mut self) -> Option<TypeExpr> {
        match self.peek()?.clone() {
            Token::Ident(name) => {
                self.pos += 1;
                if self.eat(&Token::LBracket) {
                    let args = self.args()?;
                    Some(TypeExpr::Generic(name, args))
                } else {
                    Some(TypeExpr::Name(name))
                }
            }
            Token::LBracket => {
                self.pos += 1;
                if self.eat(&Token::RBracket) {
                    return Some(TypeExpr::List(Vec::new()));
                }
                let items = self.args()?;
                Some(TypeExpr::List(items))
            }
            _ => None,
        }
    }

    /// Comma-separated items up to and including the closing bracket
    fn args(&mut self) -> Option<Vec<TypeExpr>> {
        let mut items = Vec::new();
        loop {
            if !items.is_empty() && self.eat(&Token::RBracket) {
                return Some(items);
            }
            items.push(self.union()?);
            if self.eat(&Token::Comma) {
                continue;
            }
            if self.eat(&Token::RBracket) {
                return Some(items);
            }
            return None;
        }
    }
}

/// Textual pipeline for spellings that are not well-formed type expressions,
/// repeated until the text stops changing
fn normalize_text(text: &str) -> String {
    let mut current = rewrite_text(text);
    loop {
        let next = rewrite_text(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn rewrite_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let unqualified = QUALIFIER_RE.replace_all(&lowered, "");
    let optional = OPTIONAL_RE.replace_all(&unqualified, "$1|none");
    let spaced = UNION_SPACING_RE.replace_all(&optional, "|");
    ALIAS_RE
        .replace_all(&spaced, |caps: &regex::Captures| {
            let word = &caps[0];
            TYPE_ALIASES
                .iter()
                .find(|(from, _)| *from == word)
                .map(|(_, to)| to.to_string())
                .unwrap_or_else(|| word.to_string())
        })
        .trim()
        .to_string()
}

/// Passes before a spelling is taken as settled
const MAX_PASSES: usize = 8;

fn normalize_once(text: &str) -> String {
    match TypeExpr::parse(text) {
        Some(expr) => expr.canonical().to_string(),
        None => normalize_text(text),
    }
}

/// Canonicalize a type spelling for equality comparison
pub fn normalize(text: &str) -> String {
    let mut current = normalize_once(text);
    for _ in 1..MAX_PASSES {
        let next = normalize_once(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

/// True when two spellings denote the same type after normalization
pub fn types_match(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}
