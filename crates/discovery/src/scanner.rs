use crate::lexer::{is_identifier, Lexer, Token};
use crate::rules::RuleEngine;
use crate::store::DiscoveryStore;
use crate::types::{FileDeclarations, FileLayout};

/// Keywords that introduce a class-like declaration
const CLASS_KEYWORDS: &[&str] = &["class", "interface", "trait"];

/// Tokens after which `class`/`define` are member names or expressions, not declarations
fn is_member_context(prev: Option<&Token<'_>>) -> bool {
    matches!(prev, Some(Token::DoubleColon | Token::Arrow))
        || prev.is_some_and(|t| t.is_keyword("function") || t.is_keyword("const"))
}

/// Extract namespace, class and constant declarations from PHP source.
///
/// Pure: nothing is recorded anywhere. Keywords inside strings, comments,
/// heredocs and inline HTML are never reported.
pub fn extract_declarations(content: &str) -> FileDeclarations {
    let tokens: Vec<Token<'_>> = Lexer::new(content).collect();
    let mut decls = FileDeclarations::default();

    let mut statements = 0usize;
    let mut blocks = 0usize;
    let mut first_statement: Option<&str> = None;

    for (idx, token) in tokens.iter().enumerate() {
        let prev = idx.checked_sub(1).map(|p| &tokens[p]);
        let next = tokens.get(idx + 1);

        if token.is_keyword("namespace") && !is_member_context(prev) {
            match (next, tokens.get(idx + 2)) {
                (Some(Token::Name(name)), Some(Token::Semicolon)) if !name.starts_with('\\') => {
                    statements += 1;
                    first_statement.get_or_insert(*name);
                    decls.push_namespace(name);
                }
                (Some(Token::Name(name)), Some(Token::OpenBrace)) if !name.starts_with('\\') => {
                    blocks += 1;
                    decls.push_namespace(name);
                }
                // `namespace { ... }` holds global code; nothing to rename.
                (Some(Token::OpenBrace), _) => blocks += 1,
                _ => {}
            }
            continue;
        }

        if CLASS_KEYWORDS.iter().any(|kw| token.is_keyword(kw)) {
            if is_member_context(prev) || prev.is_some_and(|t| t.is_keyword("new")) {
                continue;
            }
            if let Some(Token::Name(name)) = next {
                if is_identifier(name) && !is_reserved_after_class(name) {
                    decls.push_class(name);
                }
            }
            continue;
        }

        if let Token::Name(name) = token {
            if name.trim_start_matches('\\').eq_ignore_ascii_case("define")
                && !is_member_context(prev)
                && !prev.is_some_and(|t| t.is_keyword("new"))
            {
                if let Some(constant) = define_call_name(&tokens[idx + 1..]) {
                    decls.push_constant(constant);
                }
            }
        }
    }

    decls.layout = match (statements, blocks, first_statement) {
        (0, 0, _) => FileLayout::Global,
        (1, 0, Some(name)) => FileLayout::SingleNamespace(name.to_string()),
        (s, b, _) => FileLayout::Blocks(s + b),
    };

    decls
}

fn is_reserved_after_class(name: &str) -> bool {
    ["extends", "implements"]
        .iter()
        .any(|kw| name.eq_ignore_ascii_case(kw))
}

/// Match `( 'NAME' , 'VALUE' ) ;` right after a `define` name token
fn define_call_name<'a>(rest: &[Token<'a>]) -> Option<&'a str> {
    match rest {
        [
            Token::OpenParen,
            Token::Str(name),
            Token::Comma,
            Token::Str(_),
            Token::CloseParen,
            Token::Semicolon,
            ..,
        ] if !name.is_empty() => Some(*name),
        _ => None,
    }
}

/// Scan `content` and record everything it declares.
///
/// Namespaces go through the rule engine; classes and constants are stored
/// verbatim. The content is returned unchanged: scanning never rewrites.
pub fn scan<'c>(content: &'c str, rules: &RuleEngine, store: &mut DiscoveryStore) -> &'c str {
    let decls = extract_declarations(content);

    if let FileLayout::SingleNamespace(namespace) = &decls.layout {
        log::trace!("File lives entirely in namespace {namespace}");
    }

    for namespace in &decls.namespaces {
        rules.register_namespace(namespace, store);
    }
    for class in decls.classes {
        log::trace!("Discovered class {class}");
        store.record_class(class);
    }
    for constant in decls.constants {
        log::trace!("Discovered constant {constant}");
        store.record_constant(constant);
    }

    content
}
