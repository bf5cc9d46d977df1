//! # Structural Noise Stripper
//!
//! Ordered regex rule groups that delete layout artifacts, front matter,
//! contact boilerplate and similar noise from extracted text.
//!
//! Every group is an ordered table of `(pattern, replacement)` pairs compiled
//! once, case-insensitive and multi-line, so `^`/`$` anchor on lines. Groups run
//! in a fixed order because later patterns assume earlier noise is gone.
//!
//! ## Document groups (PDF text)
//!
//! 1. `structure` - hyphenation joins, TOC leaders, page numbers, page markers
//! 2. `academic_front_matter` - institutional headers, thesis declarations
//! 3. `metadata` - technical-note banners, organization handles, scan footers
//! 4. `contacts` - emails, URLs, DOIs, postal codes, CNPJ, addresses
//! 5. `tables_and_figures` - numeric rows, figure/table references, captions
//! 6. `navigation_junk` - bare numbering, bullets, roman numerals, chapters
//!
//! `citations` runs separately, after the narrative line filter.
//!
//! ## Web groups (news and dashboard text)
//!
//! `markup`, `journalistic`, `figure_references`, `web_garbage`, `academic_noise`.

use regex::Regex;
use std::sync::LazyLock;

/// A single compiled substitution.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

impl Rule {
    /// Returns the source pattern (including the group flags).
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Returns true if the rule matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Applies the substitution to every match.
    pub fn apply(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, self.replacement)
            .into_owned()
    }
}

/// A named, ordered list of rules.
#[derive(Debug, Clone)]
pub struct RuleGroup {
    name: &'static str,
    rules: Vec<Rule>,
}

impl RuleGroup {
    /// Compiles a rule table with case-insensitive, multi-line flags.
    ///
    /// Patterns are literals owned by this module; a bad pattern is a bug.
    fn compile(name: &'static str, table: &[(&str, &'static str)]) -> Self {
        let rules = table
            .iter()
            .map(|(pattern, replacement)| Rule {
                pattern: Regex::new(&format!("(?im){}", pattern)).unwrap(),
                replacement,
            })
            .collect();
        Self { name, rules }
    }

    /// Group name as used in logs and tests.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Rules in application order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules in the group.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the group has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Applies every rule in order.
    pub fn apply(&self, text: &str) -> String {
        let mut result = text.to_string();
        for rule in &self.rules {
            if rule.is_match(&result) {
                result = rule.apply(&result);
            }
        }
        result
    }
}

// ============================================================================
// Document groups
// ============================================================================

pub static STRUCTURE: LazyLock<RuleGroup> = LazyLock::new(|| {
    RuleGroup::compile(
        "structure",
        &[
            // Hyphenated word split across a line break
            (r"(\w+)-[ \t]*\n\s*(\w+)", "${1}${2}"),
            // Dot leaders / ellipsis (table of contents)
            (r"^.*(?:\.{4,}|…{2,}).*$", ""),
            // Bare page number
            (r"^[ \t]*\d+[ \t]*$", ""),
            // Page break markers from the extractor
            (r"-{2,}[ \t]*PAGE[ \t]+\d+[ \t]*-{2,}", ""),
            (r"Página[ \t]+\d+[ \t]+de[ \t]+\d+", ""),
        ],
    )
});

pub static ACADEMIC_FRONT_MATTER: LazyLock<RuleGroup> = LazyLock::new(|| {
    RuleGroup::compile(
        "academic_front_matter",
        &[
            // Institutional headers
            (r"^[ \t]*INSTITUTO FEDERAL.*", ""),
            (r"^[ \t]*UNIVERSIDADE.*", ""),
            (r"^[ \t]*FACULDADE.*", ""),
            (r"^[ \t]*PRÓ-REITORIA.*", ""),
            (r"^[ \t]*DIRETORIA DE.*", ""),
            (r"^[ \t]*COORDENAÇÃO DE.*", ""),
            (r"^[ \t]*CURSO DE.*", ""),
            (r"^[ \t]*DEPARTAMENTO DE.*", ""),
            (r"^[ \t]*PROGRAMA DE PÓS-GRADUAÇÃO.*", ""),
            // Nature of the work
            (r"^[ \t]*TCC-Artigo apresentado.*", ""),
            (r"^[ \t]*Trabalho de Conclusão de Curso.*", ""),
            (r"^[ \t]*Monografia submetida.*", ""),
            (r"^[ \t]*Dissertação.*", ""),
            (r"^[ \t]*Tese apresentada.*", ""),
            (r"^[ \t]*Artigo apresentado.*", ""),
            (r"^[ \t]*Requisito para obtenção.*", ""),
            // Committee and advisors
            (r"^[ \t]*Orientadora?:.*", ""),
            (r"^[ \t]*Coorientadora?:.*", ""),
            (r"^[ \t]*Banca Examinadora.*", ""),
            (r"^[ \t]*Prof\.[ \t]*Dr\..*", ""),
            (r"^[ \t]*Prof\.[ \t]*Ms\..*", ""),
            (r"^[ \t]*Aprovad[oa] em:.*", ""),
            // Pre-textual elements
            (r"^[ \t]*DEDICATÓRIA.*", ""),
            (r"^[ \t]*AGRADECIMENTOS.*", ""),
            (r"^[ \t]*EPÍGRAFE.*", ""),
            (r"^[ \t]*RESUMO[ \t]*$", ""),
            (r"^[ \t]*ABSTRACT[ \t]*$", ""),
            (r"^[ \t]*LISTA DE .*", ""),
            (r"^[ \t]*SUMÁRIO[ \t]*$", ""),
            // Also catches the common "COTALOGRÁFICA" OCR misspelling
            (r"^[ \t]*FICHA C[AO]TALOGRÁFICA.*", ""),
        ],
    )
});

pub static METADATA: LazyLock<RuleGroup> = LazyLock::new(|| {
    RuleGroup::compile(
        "metadata",
        &[
            (r"NOTA TÉCNICA.*", ""),
            (r"AMAZÔNIA EM CHAMAS.*", ""),
            (r"REFERÊNCIAS BIBLIOGRÁFICAS.*", ""),
            (r"CONSIDERAÇÕES FINAIS.*", ""),
            // Organization handles: drop the token, keep the sentence
            (r"ipam\.org\.br\S*", ""),
            (r"@?ipam_amazonia\S*", ""),
            (r"@?IPAMamazonia\S*", ""),
            (r"@?IPAMclima\S*", ""),
            (
                r"(?:Janeiro|Fevereiro|Março|Abril|Maio|Junho|Julho|Agosto|Setembro|Outubro|Novembro|Dezembro) de \d{4}[ \t]*•[ \t]*nº[ \t]*\d+",
                "",
            ),
            // Scan / signature footers
            (r"^[ \t]*Documento Digitalizado.*", ""),
            (r"^[ \t]*Assinado digitalmente.*", ""),
        ],
    )
});

pub static CONTACTS: LazyLock<RuleGroup> = LazyLock::new(|| {
    RuleGroup::compile(
        "contacts",
        &[
            (r"(?:E-mails?:?[ \t]*)?[\w.-]+@[\w.-]+\.\w+", ""),
            (r"https?://\S+", ""),
            (r"www\.\S+", ""),
            (r"doi:?[ \t]*10\.\S+", ""),
            // CEP
            (r"^.*\b\d{5}-\d{3}\b.*$", ""),
            (r"^.*\bCNPJ:?[ \t]*\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2}\b.*$", ""),
            // Capitalized only: "sala de aula" in prose must survive
            (r"^.*\b(?-i:Av\.|Rua|Alameda|Bloco|Sala)[ \t]+.*$", ""),
            (r"^[ \t]*Brasília,[ \t]*DF.*", ""),
        ],
    )
});

pub static TABLES_AND_FIGURES: LazyLock<RuleGroup> = LazyLock::new(|| {
    RuleGroup::compile(
        "tables_and_figures",
        &[
            // Land-category rows: TI 1.234 5.678 ...
            (r"^(?:TI|UC|APA|ASR|PP|ND|SI)[ \t]+[\d.]+[ \t]+[\d.]+.*$", ""),
            (r"^Categoria fundiária.*", ""),
            (r"^.*[\d.,]{3,}[ \t]+[\d.,]{3,}[ \t]+[\d.,]{3,}.*$", ""),
            (
                r"\(\s*(?:ver|vide|consultar|fonte:?)?[:\s]*(?:Figura|Fig\.|Tabela|Tab\.|Quadro|Gráfico|Mapa|Imagem|Foto|Anexo)\s+[\w.-]+\s*\)",
                "",
            ),
            (
                r"\b(?:Figura|Fig\.|Tabela|Tab\.|Quadro|Gráfico|Mapa|Imagem|Foto|Anexo)\s+\d+(?:[.-]\d+)*\b",
                "",
            ),
            // Caption lines
            (r"^[ \t]*(?:Fonte|Foto|Elaboração|Organização):.*$", ""),
        ],
    )
});

pub static NAVIGATION_JUNK: LazyLock<RuleGroup> = LazyLock::new(|| {
    RuleGroup::compile(
        "navigation_junk",
        &[
            (r"^[ \t]*[\d.]+[ \t]*$", ""),
            (r"^[ \t]*[•●-][ \t]*$", ""),
            (r"^[ \t]*[IVXLCDM]+\.[ \t]*$", ""),
            (r"^[ \t]*CAPÍTULO[ \t]+[IVXLCDM\d]+[ \t]*$", ""),
        ],
    )
});

pub static CITATIONS: LazyLock<RuleGroup> = LazyLock::new(|| {
    RuleGroup::compile(
        "citations",
        &[
            // (Silva et al., 2019) / (INPE, 2020)
            (r"\([^)]+\d{4}[^)]*\)", ""),
            (r"^.*Global Change Biology.*$", ""),
            (r"^.*Ecological Applications.*$", ""),
            (r"^.*Proceedings of the National Academy.*$", ""),
        ],
    )
});

// ============================================================================
// Web groups
// ============================================================================

pub static MARKUP: LazyLock<RuleGroup> =
    LazyLock::new(|| RuleGroup::compile("markup", &[(r"<[^>\n]*>", "")]));

pub static JOURNALISTIC: LazyLock<RuleGroup> = LazyLock::new(|| {
    RuleGroup::compile(
        "journalistic",
        &[
            (r"[-–—][ \t]*Foto:[ \t]*MapBiomas[ \t]*", ""),
            (r"[-–—]?[ \t]*Arte[ \t]*g1", ""),
            (r"/[ \t]*File[ \t]*Photo", ""),
            (r"/[ \t]*Reuters", ""),
            // Inline photo credit: "— Foto: Marcelo Camargo/Agência Brasil"
            (r"[-–—][ \t]*Foto:[^.\n]*", ""),
            (r"^[ \t]*Foto:.*", ""),
            (r"^[ \t]*Fonte:.*", ""),
        ],
    )
});

pub static FIGURE_REFERENCES: LazyLock<RuleGroup> = LazyLock::new(|| {
    RuleGroup::compile(
        "figure_references",
        &[
            (
                r"[ \t]*\([ \t]*(?:ver|vide)?[ \t]*(?:Figura|Fig\.|Tabela|Tab\.|Quadro|Gráfico|Anexo)[ \t]+[\w.]+[ \t]*\)",
                "",
            ),
            (r"\b(?:Figura|Tabela|Quadro)[ \t]+\d+(?:\.[ \t]+|\b)", ""),
        ],
    )
});

pub static WEB_GARBAGE: LazyLock<RuleGroup> = LazyLock::new(|| {
    RuleGroup::compile(
        "web_garbage",
        &[
            (r"@?ipam_amazonia\S*", ""),
            (r"@?IPAMamazonia\S*", ""),
            (r"ipam\.org\.br\S*", ""),
            // Mirrored chart labels
            (r"otnemuA", ""),
            (r"oãçudeR", ""),
            (r"Sugestão de referência.*", ""),
            (r"NOTA TÉCNICA.*", ""),
            (r"https?\S+", ""),
            (r"www\.\S+", ""),
            (r"Ouça este conteúdo", ""),
            (r"VEJA TAMBÉM", ""),
            (r"Notícias\s*MEIO\s*AMBIENTE", ""),
            (r"Por\s+WWF-Brasil", ""),
            // Dateline residue: "brasília, 12 2023"
            (r"^[a-zç]+,[ \t]+\d+[ \t]+\d+", ""),
            (r"Brigadistas do Ibama.*?Amazonas", ""),
            (r"- •", ""),
            // Dashboard pop-ups span several lines
            (r"Terra Brasilis Queimadas(?s:.*?)clicando nesta caixa\.?", ""),
            (r"Sobre Terra Brasill?is(?s:.*?)Não mostrar novamente\.?", ""),
            (r"Terra Brasilis\|", ""),
            (r"^[ \t]*vide linha \d+.*", ""),
            (r"^[ \t]*viAcessar material.*", ""),
            (r"Acesse o site.*", ""),
            (r"Clique aqui.*", ""),
        ],
    )
});

pub static ACADEMIC_NOISE: LazyLock<RuleGroup> = LazyLock::new(|| {
    RuleGroup::compile(
        "academic_noise",
        &[
            (r"Disponível em:.*", ""),
            (r"Acesso em:.*", ""),
            (r"SUMÁRIO[ \t]+\d+\.", ""),
            (r"^[ \t]*REFERÊNCIAS.*", ""),
            (r"INTRODUÇÃO[ \t]*\.{2,}[ \t]*\d*", ""),
        ],
    )
});

/// Document groups in mandatory order.
pub fn document_groups() -> [&'static RuleGroup; 6] {
    [
        &STRUCTURE,
        &ACADEMIC_FRONT_MATTER,
        &METADATA,
        &CONTACTS,
        &TABLES_AND_FIGURES,
        &NAVIGATION_JUNK,
    ]
}

/// Web groups in mandatory order.
pub fn web_groups() -> [&'static RuleGroup; 5] {
    [
        &MARKUP,
        &JOURNALISTIC,
        &FIGURE_REFERENCES,
        &WEB_GARBAGE,
        &ACADEMIC_NOISE,
    ]
}

/// Applies a sequence of groups in the given order.
pub fn apply_groups<'a>(text: &str, groups: impl IntoIterator<Item = &'a RuleGroup>) -> String {
    let mut result = text.to_string();
    for group in groups {
        result = group.apply(&result);
    }
    result
}

/// Applies all six document groups in their mandatory order.
///
/// # Example
///
/// ```
/// use descreve::rules::strip;
///
/// let text = "Focos de calor no Cerrado.\n--- PAGE 2 ---\n17\nContato: fogo@inpe.br";
/// let clean = strip(text);
/// assert!(!clean.contains("PAGE"));
/// assert!(!clean.contains("@inpe.br"));
/// ```
pub fn strip(text: &str) -> String {
    apply_groups(text, document_groups())
}
