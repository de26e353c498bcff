//! Lexical analyzer for block diagram source text.
//!
//! The lexer is mode sensitive: quoted strings, node shapes, block arrows,
//! link labels and the bodies of `classDef`, `class`, `style` and
//! accessibility statements each have their own rule set. The active mode is
//! the top of an explicit stack owned by the [`Lexer`].
//!
//! In every mode all rules are tried against the upcoming text. The longest
//! match wins and ties go to the rule declared first. Zero-length matches
//! never win.

use log::trace;
use winnow::{
    Parser as _,
    ascii::digit1,
    combinator::{alt, not, opt},
    error::{ContextError, ErrMode, ModalResult},
    token::{literal, one_of, take_while},
};

use crate::{
    error::{Diagnostic, ErrorCode, ParseError},
    span::{Position, Span},
    tokens::{PositionedToken, TokenKind},
};

type IResult<O> = ModalResult<O>;
type Matcher = fn(&mut &str) -> IResult<()>;

/// Characters of context shown on each side of a lexical error.
const EXCERPT_CONTEXT: usize = 20;

/// Lexical modes. `Initial` is always at the bottom of the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Initial,
    String,
    MdString,
    Node,
    BlockArrow,
    ArrowDir,
    LinkLabel,
    ClassDef,
    ClassDefBody,
    Class,
    ClassBody,
    Style,
    StyleBody,
    AccTitle,
    AccDescr,
    AccDescrMultiline,
}

/// Mode stack change applied after a rule matches.
#[derive(Debug, Clone, Copy)]
enum Transition {
    Stay,
    Push(Mode),
    Pop,
    /// Replace the top of the stack.
    Switch(Mode),
    PopTwice,
}

#[derive(Clone, Copy)]
enum Pattern {
    Literal(&'static str),
    Matcher(Matcher),
}

impl Pattern {
    fn match_len(&self, rest: &str) -> Option<usize> {
        match self {
            Pattern::Literal(lit) => rest.starts_with(lit).then_some(lit.len()),
            Pattern::Matcher(matcher) => {
                let mut cursor = rest;
                matcher(&mut cursor).ok().map(|()| rest.len() - cursor.len())
            }
        }
    }
}

#[derive(Clone, Copy)]
struct Rule {
    pattern: Pattern,
    token: Option<TokenKind>,
    transition: Transition,
}

impl Rule {
    const fn skip(matcher: Matcher) -> Self {
        Self {
            pattern: Pattern::Matcher(matcher),
            token: None,
            transition: Transition::Stay,
        }
    }

    const fn emit(matcher: Matcher, token: TokenKind) -> Self {
        Self {
            pattern: Pattern::Matcher(matcher),
            token: Some(token),
            transition: Transition::Stay,
        }
    }

    const fn literal(lit: &'static str, token: Option<TokenKind>) -> Self {
        Self {
            pattern: Pattern::Literal(lit),
            token,
            transition: Transition::Stay,
        }
    }

    const fn then(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }
}

use Mode as M;
use TokenKind as T;
use Transition::{Pop, PopTwice, Push, Switch};

static INITIAL_RULES: &[Rule] = &[
    Rule::emit(diagram_key, T::BlockDiagramKey),
    Rule::emit(block_open, T::Block),
    Rule::literal("block:", Some(T::IdBlock)),
    Rule::skip(whitespace),
    Rule::skip(comment),
    Rule::emit(columns_auto, T::Columns),
    Rule::emit(columns_count, T::Columns),
    Rule::literal("\"`", None).then(Push(M::MdString)),
    Rule::literal("\"", None).then(Push(M::String)),
    Rule::emit(space_count, T::SpaceBlock),
    Rule::emit(space_one, T::SpaceBlock),
    Rule::emit(class_def_open, T::ClassDef).then(Push(M::ClassDef)),
    Rule::emit(class_open, T::Class).then(Push(M::Class)),
    Rule::emit(style_open, T::Style).then(Push(M::Style)),
    Rule::emit(acc_title_open, T::AccTitle).then(Push(M::AccTitle)),
    Rule::emit(acc_descr_open, T::AccDescr).then(Push(M::AccDescr)),
    Rule::skip(acc_descr_multiline_open).then(Push(M::AccDescrMultiline)),
    Rule::emit(end_keyword, T::End),
    Rule::literal("-)", Some(T::NodeDStart)).then(Push(M::Node)),
    Rule::literal("(-", Some(T::NodeDStart)).then(Push(M::Node)),
    Rule::literal("))", Some(T::NodeDStart)).then(Push(M::Node)),
    Rule::literal(")", Some(T::NodeDStart)).then(Push(M::Node)),
    Rule::literal("(((", Some(T::NodeDStart)).then(Push(M::Node)),
    Rule::literal("((", Some(T::NodeDStart)).then(Push(M::Node)),
    Rule::literal("{{", Some(T::NodeDStart)).then(Push(M::Node)),
    Rule::literal("{", Some(T::NodeDStart)).then(Push(M::Node)),
    Rule::literal(">", Some(T::NodeDStart)).then(Push(M::Node)),
    Rule::literal("([", Some(T::NodeDStart)).then(Push(M::Node)),
    Rule::literal("(", Some(T::NodeDStart)).then(Push(M::Node)),
    Rule::literal("[[", Some(T::NodeDStart)).then(Push(M::Node)),
    Rule::literal("[|", Some(T::NodeDStart)).then(Push(M::Node)),
    Rule::literal("[(", Some(T::NodeDStart)).then(Push(M::Node)),
    Rule::literal(")))", Some(T::NodeDStart)).then(Push(M::Node)),
    Rule::literal("[\\", Some(T::NodeDStart)).then(Push(M::Node)),
    Rule::literal("[/", Some(T::NodeDStart)).then(Push(M::Node)),
    Rule::literal("[", Some(T::NodeDStart)).then(Push(M::Node)),
    Rule::literal("<[", Some(T::BlockArrowStart)).then(Push(M::BlockArrow)),
    Rule::emit(node_id, T::NodeId),
    Rule::emit(link_solid, T::Link),
    Rule::emit(link_thick, T::Link),
    Rule::emit(link_dotted, T::Link),
    Rule::emit(link_invisible, T::Link),
    Rule::emit(start_link_solid, T::StartLink).then(Push(M::LinkLabel)),
    Rule::emit(start_link_thick, T::StartLink).then(Push(M::LinkLabel)),
    Rule::emit(start_link_dotted, T::StartLink).then(Push(M::LinkLabel)),
    Rule::emit(size, T::Size),
];

static STRING_RULES: &[Rule] = &[
    Rule::literal("\"", None).then(Pop),
    Rule::emit(string_content, T::Str),
];

static MD_STRING_RULES: &[Rule] = &[
    Rule::emit(md_string_content, T::MdStr),
    Rule::literal("`\"", None).then(Pop),
];

static NODE_RULES: &[Rule] = &[
    Rule::literal("(((", Some(T::NodeDEnd)).then(Pop),
    Rule::literal(")))", Some(T::NodeDEnd)).then(Pop),
    Rule::literal("))", Some(T::NodeDEnd)).then(Pop),
    Rule::literal("}}", Some(T::NodeDEnd)).then(Pop),
    Rule::literal("}", Some(T::NodeDEnd)).then(Pop),
    Rule::literal("(-", Some(T::NodeDEnd)).then(Pop),
    Rule::literal("-)", Some(T::NodeDEnd)).then(Pop),
    Rule::literal("((", Some(T::NodeDEnd)).then(Pop),
    Rule::literal("]]", Some(T::NodeDEnd)).then(Pop),
    Rule::literal("(", Some(T::NodeDEnd)).then(Pop),
    Rule::literal("])", Some(T::NodeDEnd)).then(Pop),
    Rule::literal("\\]", Some(T::NodeDEnd)).then(Pop),
    Rule::literal("/]", Some(T::NodeDEnd)).then(Pop),
    Rule::literal(")]", Some(T::NodeDEnd)).then(Pop),
    Rule::literal(")", Some(T::NodeDEnd)).then(Pop),
    Rule::literal("]>", Some(T::NodeDEnd)).then(Pop),
    Rule::literal("]", Some(T::NodeDEnd)).then(Pop),
    Rule::literal("\"`", None).then(Push(M::MdString)),
    Rule::literal("\"", None).then(Push(M::String)),
];

static BLOCK_ARROW_RULES: &[Rule] = &[
    Rule::literal("\"`", None).then(Push(M::MdString)),
    Rule::literal("\"", None).then(Push(M::String)),
    Rule::skip(arrow_dir_open).then(Push(M::ArrowDir)),
];

static ARROW_DIR_RULES: &[Rule] = &[
    Rule::emit(direction, T::Dir),
    Rule::emit(arrow_dir_close, T::BlockArrowEnd).then(PopTwice),
];

static LINK_LABEL_RULES: &[Rule] = &[
    Rule::literal("\"`", Some(T::LinkLabel)).then(Push(M::MdString)),
    Rule::literal("\"", Some(T::LinkLabel)).then(Push(M::String)),
    Rule::emit(link_solid, T::Link).then(Pop),
    Rule::emit(link_thick, T::Link).then(Pop),
    Rule::emit(link_dotted, T::Link).then(Pop),
];

static CLASS_DEF_RULES: &[Rule] = &[
    Rule::emit(default_class_id, T::DefaultClassDef).then(Switch(M::ClassDefBody)),
    Rule::emit(class_id, T::ClassDefId).then(Switch(M::ClassDefBody)),
];

static CLASS_DEF_BODY_RULES: &[Rule] = &[Rule::emit(rest_of_line, T::ClassDefStyleOpts).then(Pop)];

static CLASS_RULES: &[Rule] =
    &[Rule::emit(entity_ids, T::ClassEntityIds).then(Switch(M::ClassBody))];

static CLASS_BODY_RULES: &[Rule] = &[Rule::emit(rest_of_line, T::StyleClass).then(Pop)];

static STYLE_RULES: &[Rule] =
    &[Rule::emit(entity_ids, T::StyleEntityIds).then(Switch(M::StyleBody))];

static STYLE_BODY_RULES: &[Rule] = &[Rule::emit(rest_of_line, T::StyleDefinitionData).then(Pop)];

static ACC_TITLE_RULES: &[Rule] = &[Rule::emit(rest_of_line, T::AccTitleValue).then(Pop)];

static ACC_DESCR_RULES: &[Rule] = &[Rule::emit(rest_of_line, T::AccDescrValue).then(Pop)];

static ACC_DESCR_MULTILINE_RULES: &[Rule] = &[
    Rule::literal("}", None).then(Pop),
    Rule::emit(until_closing_brace, T::AccDescrMultilineValue),
];

impl Mode {
    fn rules(self) -> &'static [Rule] {
        match self {
            Mode::Initial => INITIAL_RULES,
            Mode::String => STRING_RULES,
            Mode::MdString => MD_STRING_RULES,
            Mode::Node => NODE_RULES,
            Mode::BlockArrow => BLOCK_ARROW_RULES,
            Mode::ArrowDir => ARROW_DIR_RULES,
            Mode::LinkLabel => LINK_LABEL_RULES,
            Mode::ClassDef => CLASS_DEF_RULES,
            Mode::ClassDefBody => CLASS_DEF_BODY_RULES,
            Mode::Class => CLASS_RULES,
            Mode::ClassBody => CLASS_BODY_RULES,
            Mode::Style => STYLE_RULES,
            Mode::StyleBody => STYLE_BODY_RULES,
            Mode::AccTitle => ACC_TITLE_RULES,
            Mode::AccDescr => ACC_DESCR_RULES,
            Mode::AccDescrMultiline => ACC_DESCR_MULTILINE_RULES,
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn backtrack<O>() -> IResult<O> {
    Err(ErrMode::Backtrack(ContextError::new()))
}

fn ws0(input: &mut &str) -> IResult<()> {
    take_while(0.., |c: char| c.is_whitespace())
        .void()
        .parse_next(input)
}

fn ws1(input: &mut &str) -> IResult<()> {
    take_while(1.., |c: char| c.is_whitespace())
        .void()
        .parse_next(input)
}

/// Succeeds when the next character does not continue a word.
fn word_boundary(input: &mut &str) -> IResult<()> {
    not(one_of(is_word_char)).parse_next(input)
}

fn word<'a>(input: &mut &'a str) -> IResult<&'a str> {
    take_while(1.., is_word_char).parse_next(input)
}

fn diagram_key(input: &mut &str) -> IResult<()> {
    ("block-beta", word_boundary).void().parse_next(input)
}

fn block_open(input: &mut &str) -> IResult<()> {
    ("block", ws1).void().parse_next(input)
}

fn whitespace(input: &mut &str) -> IResult<()> {
    ws1(input)
}

fn comment(input: &mut &str) -> IResult<()> {
    ("%%", take_while(0.., |c: char| c != '\n'))
        .void()
        .parse_next(input)
}

fn columns_auto(input: &mut &str) -> IResult<()> {
    ("columns", ws1, "auto", word_boundary)
        .void()
        .parse_next(input)
}

fn columns_count(input: &mut &str) -> IResult<()> {
    ("columns", ws1, digit1).void().parse_next(input)
}

fn space_count(input: &mut &str) -> IResult<()> {
    ("space:", digit1).void().parse_next(input)
}

fn space_one(input: &mut &str) -> IResult<()> {
    ("space", word_boundary).void().parse_next(input)
}

fn class_def_open(input: &mut &str) -> IResult<()> {
    ("classDef", ws1).void().parse_next(input)
}

fn class_open(input: &mut &str) -> IResult<()> {
    ("class", ws1).void().parse_next(input)
}

fn style_open(input: &mut &str) -> IResult<()> {
    ("style", ws1).void().parse_next(input)
}

fn acc_title_open(input: &mut &str) -> IResult<()> {
    ("accTitle", ws0, ':', ws0).void().parse_next(input)
}

fn acc_descr_open(input: &mut &str) -> IResult<()> {
    ("accDescr", ws0, ':', ws0).void().parse_next(input)
}

fn acc_descr_multiline_open(input: &mut &str) -> IResult<()> {
    ("accDescr", ws0, '{', ws0).void().parse_next(input)
}

fn end_keyword(input: &mut &str) -> IResult<()> {
    ("end", word_boundary, ws0).void().parse_next(input)
}

fn node_id(input: &mut &str) -> IResult<()> {
    take_while(1.., |c: char| {
        !c.is_whitespace() && !matches!(c, '(' | '[' | '-' | ')' | '{' | '}' | '<' | '>' | ':')
    })
    .void()
    .parse_next(input)
}

/// A run of at least two `line` characters closed by a head or by a third `line`.
fn line_run(input: &mut &str, line: char) -> IResult<()> {
    let run = take_while(2.., line).parse_next(input)?;
    if opt(one_of(['x', 'o', '>'])).parse_next(input)?.is_some() || run.len() >= 3 {
        Ok(())
    } else {
        backtrack()
    }
}

fn arrow_tail(input: &mut &str) -> IResult<()> {
    opt(one_of(['x', 'o', '<'])).void().parse_next(input)
}

fn link_solid(input: &mut &str) -> IResult<()> {
    ws0(input)?;
    arrow_tail(input)?;
    line_run(input, '-')?;
    ws0(input)
}

fn link_thick(input: &mut &str) -> IResult<()> {
    ws0(input)?;
    arrow_tail(input)?;
    line_run(input, '=')?;
    ws0(input)
}

fn link_dotted(input: &mut &str) -> IResult<()> {
    (
        ws0,
        arrow_tail,
        opt('-'),
        take_while(1.., '.'),
        '-',
        opt(one_of(['x', 'o', '>'])),
        ws0,
    )
        .void()
        .parse_next(input)
}

fn link_invisible(input: &mut &str) -> IResult<()> {
    (ws0, "~~", take_while(1.., '~'), ws0)
        .void()
        .parse_next(input)
}

fn start_link_solid(input: &mut &str) -> IResult<()> {
    (ws0, arrow_tail, "--", ws0).void().parse_next(input)
}

fn start_link_thick(input: &mut &str) -> IResult<()> {
    (ws0, arrow_tail, "==", ws0).void().parse_next(input)
}

fn start_link_dotted(input: &mut &str) -> IResult<()> {
    (ws0, arrow_tail, "-.", ws0).void().parse_next(input)
}

fn size(input: &mut &str) -> IResult<()> {
    (':', digit1).void().parse_next(input)
}

fn string_content(input: &mut &str) -> IResult<()> {
    take_while(0.., |c: char| c != '"')
        .void()
        .parse_next(input)
}

fn md_string_content(input: &mut &str) -> IResult<()> {
    take_while(1.., |c: char| c != '`' && c != '"')
        .void()
        .parse_next(input)
}

fn arrow_dir_open(input: &mut &str) -> IResult<()> {
    ("]>", ws0, '(').void().parse_next(input)
}

fn direction(input: &mut &str) -> IResult<()> {
    (
        opt(','),
        ws0,
        alt((
            literal("right"),
            literal("left"),
            literal("up"),
            literal("down"),
            literal("x"),
            literal("y"),
        )),
        ws0,
    )
        .void()
        .parse_next(input)
}

fn arrow_dir_close(input: &mut &str) -> IResult<()> {
    (')', ws0).void().parse_next(input)
}

fn default_class_id(input: &mut &str) -> IResult<()> {
    ("DEFAULT", ws1).void().parse_next(input)
}

fn class_id(input: &mut &str) -> IResult<()> {
    (word, ws1).void().parse_next(input)
}

/// `a` or `a, b,c`
fn entity_ids(input: &mut &str) -> IResult<()> {
    word.parse_next(input)?;
    loop {
        let checkpoint = *input;
        if (',', ws0, word).parse_next(input).is_err() {
            *input = checkpoint;
            return Ok(());
        }
    }
}

fn rest_of_line(input: &mut &str) -> IResult<()> {
    take_while(0.., |c: char| c != '\n')
        .void()
        .parse_next(input)
}

fn until_closing_brace(input: &mut &str) -> IResult<()> {
    take_while(0.., |c: char| c != '}')
        .void()
        .parse_next(input)
}

/// An on-demand tokenizer over one source string.
pub(crate) struct Lexer<'a> {
    source: &'a str,
    offset: usize,
    modes: Vec<Mode>,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Self {
            source,
            offset: 0,
            modes: vec![Mode::Initial],
        }
    }

    fn mode(&self) -> Mode {
        self.modes.last().copied().unwrap_or(Mode::Initial)
    }

    fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::Stay => {}
            Transition::Push(mode) => self.modes.push(mode),
            Transition::Pop => self.pop(),
            Transition::Switch(mode) => {
                self.pop();
                self.modes.push(mode);
            }
            Transition::PopTwice => {
                self.pop();
                self.pop();
            }
        }
    }

    fn pop(&mut self) {
        if self.modes.len() > 1 {
            self.modes.pop();
        }
    }

    /// Returns the next token. At end of input this returns [`TokenKind::Eof`]
    /// on every call.
    pub(crate) fn next_token(&mut self) -> Result<PositionedToken<'a>, Diagnostic> {
        loop {
            let rest = &self.source[self.offset..];
            if rest.is_empty() {
                let end = self.source.len();
                return Ok(PositionedToken::new(TokenKind::Eof, "", Span::new(end..end)));
            }

            let mut best: Option<(usize, &Rule)> = None;
            for rule in self.mode().rules() {
                let Some(len) = rule.pattern.match_len(rest) else {
                    continue;
                };
                if len > 0 && best.is_none_or(|(best_len, _)| len > best_len) {
                    best = Some((len, rule));
                }
            }

            let Some((len, rule)) = best else {
                return Err(self.unexpected_input());
            };

            let start = self.offset;
            self.offset += len;
            self.apply(rule.transition);

            if let Some(kind) = rule.token {
                let text = &self.source[start..self.offset];
                trace!(kind:?, text; "Token");
                return Ok(PositionedToken::new(kind, text, Span::new(start..self.offset)));
            }
        }
    }

    fn unexpected_input(&self) -> Diagnostic {
        let rest = &self.source[self.offset..];
        let ch = rest.chars().next().unwrap_or_default();
        let span = Span::new(self.offset..self.offset + ch.len_utf8());
        let position = Position::locate(self.source, self.offset);

        Diagnostic::error(format!(
            "unexpected input `{}` on line {}",
            ch.escape_debug(),
            position.line
        ))
        .with_code(ErrorCode::E001)
        .with_label(span, ErrorCode::E001.description())
        .with_position(position)
        .with_excerpt(self.excerpt())
    }

    /// Last consumed and next upcoming characters with a caret under the failure point.
    fn excerpt(&self) -> String {
        let consumed: Vec<char> = self.source[..self.offset].chars().collect();
        let past: String = if consumed.len() > EXCERPT_CONTEXT {
            let tail: String = consumed[consumed.len() - EXCERPT_CONTEXT..].iter().collect();
            format!("...{tail}")
        } else {
            consumed.iter().collect()
        };
        let past = past.replace('\n', "");

        let upcoming_chars: Vec<char> = self.source[self.offset..].chars().collect();
        let upcoming: String = if upcoming_chars.len() > EXCERPT_CONTEXT {
            let head: String = upcoming_chars[..EXCERPT_CONTEXT].iter().collect();
            format!("{head}...")
        } else {
            upcoming_chars.iter().collect()
        };
        let upcoming = upcoming.replace('\n', "");

        let dashes = "-".repeat(past.chars().count());
        format!("{past}{upcoming}\n{dashes}^")
    }
}

/// Tokenizes the whole input, ending with a single [`TokenKind::Eof`].
pub fn tokenize(source: &str) -> Result<Vec<PositionedToken<'_>>, ParseError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .expect("input should tokenize")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn texts(input: &str) -> Vec<&str> {
        tokenize(input)
            .expect("input should tokenize")
            .into_iter()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_diagram_key_and_nodes() {
        assert_eq!(
            kinds("block-beta\n a b"),
            [T::BlockDiagramKey, T::NodeId, T::NodeId, T::Eof]
        );
    }

    #[test]
    fn test_keywords_need_word_boundaries() {
        assert_eq!(kinds("spacer"), [T::NodeId, T::Eof]);
        assert_eq!(kinds("space"), [T::SpaceBlock, T::Eof]);
        assert_eq!(kinds("ending"), [T::NodeId, T::Eof]);
        assert_eq!(kinds("end"), [T::End, T::Eof]);
    }

    #[test]
    fn test_block_openers() {
        assert_eq!(kinds("block\n"), [T::Block, T::Eof]);
        assert_eq!(kinds("block:g"), [T::IdBlock, T::NodeId, T::Eof]);
        assert_eq!(kinds("blocky"), [T::NodeId, T::Eof]);
    }

    #[test]
    fn test_columns_and_space() {
        assert_eq!(texts("columns 3"), ["columns 3", ""]);
        assert_eq!(kinds("columns auto"), [T::Columns, T::Eof]);
        assert_eq!(kinds("space:4 space"), [T::SpaceBlock, T::SpaceBlock, T::Eof]);
    }

    #[test]
    fn test_node_shape_modes() {
        assert_eq!(
            kinds(r#"a(("circle"))"#),
            [T::NodeId, T::NodeDStart, T::Str, T::NodeDEnd, T::Eof]
        );
        assert_eq!(
            texts(r#"db[("Data")]"#),
            ["db", "[(", "Data", ")]", ""]
        );
        assert_eq!(
            texts(r#"t[/"Trap"\]"#),
            ["t", "[/", "Trap", "\\]", ""]
        );
    }

    #[test]
    fn test_empty_string_emits_no_text_token() {
        assert_eq!(
            kinds(r#"a[""]"#),
            [T::NodeId, T::NodeDStart, T::NodeDEnd, T::Eof]
        );
    }

    #[test]
    fn test_markdown_string() {
        assert_eq!(
            texts(r#"a["`**bold**`"]"#),
            ["a", "[", "**bold**", "]", ""]
        );
        assert_eq!(kinds(r#"a["`x`"]"#)[2], T::MdStr);
    }

    #[test]
    fn test_block_arrow() {
        assert_eq!(
            texts(r#"ba<["go"]>(right, down)"#),
            ["ba", "<[", "go", "right", ", down", ")", ""]
        );
        assert_eq!(
            kinds(r#"ba<["go"]>(x)"#),
            [
                T::NodeId,
                T::BlockArrowStart,
                T::Str,
                T::Dir,
                T::BlockArrowEnd,
                T::Eof
            ]
        );
    }

    #[test]
    fn test_links_win_longest_match() {
        assert_eq!(kinds("a --> b"), [T::NodeId, T::Link, T::NodeId, T::Eof]);
        assert_eq!(kinds("a-->b"), [T::NodeId, T::Link, T::NodeId, T::Eof]);
        assert_eq!(texts("a --- b")[1], " --- ");
        assert_eq!(texts("a ==> b")[1], " ==> ");
        assert_eq!(texts("a -.-> b")[1], " -.-> ");
        assert_eq!(texts("a ~~~ b")[1], " ~~~ ");
        assert_eq!(texts("a <--> b")[1], " <--> ");
        assert_eq!(texts("a --x b")[1], " --x ");
    }

    #[test]
    fn test_labelled_link() {
        assert_eq!(
            kinds(r#"a -- "yes" --> b"#),
            [
                T::NodeId,
                T::StartLink,
                T::LinkLabel,
                T::Str,
                T::Link,
                T::NodeId,
                T::Eof
            ]
        );
    }

    #[test]
    fn test_size_suffix() {
        assert_eq!(texts("a:2"), ["a", ":2", ""]);
    }

    #[test]
    fn test_class_def() {
        assert_eq!(
            texts("classDef blue fill:#66f,stroke:#333;\na"),
            ["classDef ", "blue ", "fill:#66f,stroke:#333;", "a", ""]
        );
        assert_eq!(
            kinds("classDef DEFAULT fill:#eee"),
            [T::ClassDef, T::DefaultClassDef, T::ClassDefStyleOpts, T::Eof]
        );
    }

    #[test]
    fn test_class_and_style() {
        assert_eq!(
            texts("class a,b blue\nstyle c fill:#f9f"),
            ["class ", "a,b", " blue", "style ", "c", " fill:#f9f", ""]
        );
    }

    #[test]
    fn test_accessibility() {
        assert_eq!(
            texts("accTitle: Overview\naccDescr: Details"),
            ["accTitle: ", "Overview", "accDescr: ", "Details", ""]
        );
        assert_eq!(
            texts("accDescr {\nmany\nlines\n}"),
            ["many\nlines\n", ""]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(kinds("%% note\na"), [T::NodeId, T::Eof]);
    }

    #[test]
    fn test_spans_cover_token_text() {
        let source = "block-beta\n  abc";
        let tokens = tokenize(source).unwrap();
        assert_eq!(tokens[1].span, Span::new(13..16));
        assert_eq!(&source[tokens[1].span.start()..tokens[1].span.end()], "abc");
    }

    #[test]
    fn test_unexpected_input_reports_line_and_excerpt() {
        let err = tokenize("block-beta\n  a\n  a[b]").unwrap_err();
        let diag = &err.diagnostics()[0];

        assert_eq!(diag.code(), Some(ErrorCode::E001));
        assert_eq!(diag.message(), "unexpected input `b` on line 3");
        assert_eq!(diag.position(), Some(Position { line: 3, column: 5 }));
        assert_eq!(diag.primary_span(), Some(Span::new(19..20)));

        let excerpt = diag.excerpt().unwrap();
        let (text, caret) = excerpt.split_once('\n').unwrap();
        assert_eq!(text, "block-beta  a  a[b]");
        assert_eq!(caret, "-----------------^");
    }

    #[test]
    fn test_excerpt_truncates_long_context() {
        let source = format!("{}[\n{}", "a".repeat(30), "b".repeat(30));
        let err = tokenize(&source).unwrap_err();
        let excerpt = err.diagnostics()[0].excerpt().unwrap().to_string();
        assert!(excerpt.starts_with("..."));
        assert!(excerpt.lines().next().unwrap().ends_with("..."));
    }

    #[test]
    fn test_unquoted_label_is_rejected() {
        let err = tokenize("a[label]").unwrap_err();
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E001));
    }
}
