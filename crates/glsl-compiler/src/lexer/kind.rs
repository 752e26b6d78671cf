//! Lexical token kinds.
//!
//! Built offline by `logos` into a table-driven DFA; this module never walks
//! source bytes by hand. Builtin type names and qualifier keywords are
//! bucketed into single variants (`KwTypeName`, `KwQualifier`) rather than
//! given one variant each — the parser distinguishes among them later by
//! atom text, the same way a real GLSL front-end's keyword table works. This
//! keeps the token-kind count small enough for [`crate::token_set::TokenSet`]
//! while still letting control-flow keywords drive grammar branches directly.

use logos::Logos;

#[derive(Logos, Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[logos(skip r"[ \t\f]+")]
#[repr(u8)]
pub enum TokenKind {
    // --- trivia ---
    Whitespace = 0,
    #[regex(r"//[^\n]*")]
    LineComment,
    #[regex(r"/\*([^*]|\*[^/])*\*/")]
    BlockComment,
    #[token("\n")]
    Newline,

    // --- literals & identifiers ---
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?[fF]?|\.[0-9]+([eE][+-]?[0-9]+)?[fF]?|[0-9]+[eE][+-]?[0-9]+[fF]?|[0-9]+[fF]|[0-9]+[lL][fF]")]
    FloatLiteral,
    #[regex(r"0[xX][0-9a-fA-F]+[uU]?|0[0-7]*[uU]?|[1-9][0-9]*[uU]?")]
    IntLiteral,
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    // --- control-flow / declaration keywords (distinguished individually) ---
    #[token("if")]
    KwIf,
    #[token("else")]
    KwElse,
    #[token("for")]
    KwFor,
    #[token("while")]
    KwWhile,
    #[token("do")]
    KwDo,
    #[token("switch")]
    KwSwitch,
    #[token("case")]
    KwCase,
    #[token("default")]
    KwDefault,
    #[token("break")]
    KwBreak,
    #[token("continue")]
    KwContinue,
    #[token("discard")]
    KwDiscard,
    #[token("return")]
    KwReturn,
    #[token("struct")]
    KwStruct,
    #[token("void")]
    KwVoid,
    #[token("const")]
    KwConst,
    #[token("true")]
    KwTrue,
    #[token("false")]
    KwFalse,
    #[token("layout")]
    KwLayout,
    #[token("precision")]
    KwPrecision,

    /// Any storage/precision/interpolation/memory/auxiliary/invariance
    /// qualifier keyword. Resolved to a specific `Qualifier` by atom text in
    /// `glsl_compiler::ast::aux`.
    #[token("in")]
    #[token("out")]
    #[token("inout")]
    #[token("uniform")]
    #[token("buffer")]
    #[token("shared")]
    #[token("precise")]
    #[token("coherent")]
    #[token("volatile")]
    #[token("restrict")]
    #[token("readonly")]
    #[token("writeonly")]
    #[token("flat")]
    #[token("smooth")]
    #[token("noperspective")]
    #[token("centroid")]
    #[token("sample")]
    #[token("patch")]
    #[token("invariant")]
    #[token("highp")]
    #[token("mediump")]
    #[token("lowp")]
    #[token("attribute")]
    #[token("varying")]
    KwQualifier,

    /// Any builtin scalar/vector/matrix/sampler/image type name. Resolved to
    /// a concrete `Type` by atom text in `glsl_compiler::types`.
    #[token("bool")]
    #[token("int")]
    #[token("uint")]
    #[token("float")]
    #[token("double")]
    #[token("bvec2")]
    #[token("bvec3")]
    #[token("bvec4")]
    #[token("ivec2")]
    #[token("ivec3")]
    #[token("ivec4")]
    #[token("uvec2")]
    #[token("uvec3")]
    #[token("uvec4")]
    #[token("vec2")]
    #[token("vec3")]
    #[token("vec4")]
    #[token("dvec2")]
    #[token("dvec3")]
    #[token("dvec4")]
    #[token("mat2")]
    #[token("mat3")]
    #[token("mat4")]
    #[token("mat2x2")]
    #[token("mat2x3")]
    #[token("mat2x4")]
    #[token("mat3x2")]
    #[token("mat3x3")]
    #[token("mat3x4")]
    #[token("mat4x2")]
    #[token("mat4x3")]
    #[token("mat4x4")]
    #[token("sampler1D")]
    #[token("sampler2D")]
    #[token("sampler3D")]
    #[token("samplerCube")]
    #[token("sampler2DShadow")]
    #[token("samplerCubeShadow")]
    #[token("sampler2DArray")]
    #[token("sampler2DArrayShadow")]
    #[token("isampler2D")]
    #[token("usampler2D")]
    #[token("image2D")]
    #[token("atomic_uint")]
    // Extended-width scalar type names (§4.6): lexed unconditionally, like
    // every other type-name keyword, but only accepted by the parser when
    // their gating extension is enabled in the compile configuration.
    #[token("int8_t")]
    #[token("int16_t")]
    #[token("int64_t")]
    #[token("uint8_t")]
    #[token("uint16_t")]
    #[token("uint64_t")]
    #[token("float16_t")]
    KwTypeName,

    // --- punctuation ---
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
    #[token("?")]
    Question,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("!")]
    Bang,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("^^")]
    CaretCaret,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("<<=")]
    ShlEq,
    #[token(">>=")]
    ShrEq,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("#")]
    Hash,
    #[token("##")]
    HashHash,

    /// A byte sequence the DFA couldn't classify. Lexing continues past it
    /// (§7 lex-error rule: "emitted as a single error token").
    Garbage,
    /// End-of-stream sentinel, always the last token in a lex context.
    Eof,
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::LineComment
                | TokenKind::BlockComment
                | TokenKind::Newline
        )
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::KwIf
                | TokenKind::KwElse
                | TokenKind::KwFor
                | TokenKind::KwWhile
                | TokenKind::KwDo
                | TokenKind::KwSwitch
                | TokenKind::KwCase
                | TokenKind::KwDefault
                | TokenKind::KwBreak
                | TokenKind::KwContinue
                | TokenKind::KwDiscard
                | TokenKind::KwReturn
                | TokenKind::KwStruct
                | TokenKind::KwVoid
                | TokenKind::KwConst
                | TokenKind::KwTrue
                | TokenKind::KwFalse
                | TokenKind::KwLayout
                | TokenKind::KwPrecision
                | TokenKind::KwQualifier
                | TokenKind::KwTypeName
        )
    }
}
