//! End-to-end tests: raw documents to sentence files to compiled corpus.

use descreve::compiler::{compile, CompileOptions, DEFAULT_MIN_LENGTH};
use descreve::{gate, storage, DomainKeywords, Error, Pipeline, SourceType};
use rand::seq::SliceRandom;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}

#[test]
fn test_raw_documents_to_corpus() {
    let raw = TempDir::new().unwrap();
    let sentences = TempDir::new().unwrap();
    let final_dir = TempDir::new().unwrap();

    write(
        raw.path(),
        "noticia.json",
        r#"{
            "raw_content": "<p>IPAMamazonia detectou 500 focos de incêndio na Amazônia.</p>\n<p>Ouça este conteúdo</p>\n<p>O governo anunciou novas medidas para a região.</p>",
            "source_type": "web_news",
            "url": "https://ipam.org.br/noticias/focos-em-alta/",
            "title": "Focos em alta"
        }"#,
    );
    write(
        raw.path(),
        "relatorio fogo.txt",
        "UNIVERSIDADE FEDERAL DE MATO GROSSO\n\
         Os focos de calor aumentaram muito no Pantanal durante a seca.\n\
         17\n\
         A brigada do Ibama combateu o incêndio na floresta por três dias.\n",
    );
    write(raw.path(), "vazio.txt", "");

    let mut docs = Vec::new();
    for name in ["noticia.json", "relatorio fogo.txt", "vazio.txt"] {
        docs.push(storage::load_document(raw.path().join(name), SourceType::PdfDocument).unwrap());
    }
    assert_eq!(docs[0].source_type, SourceType::WebNews);

    let report = Pipeline::new().save_all(&docs, sentences.path()).unwrap();
    assert_eq!(report.documents, 3);
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].0, "vazio");

    let names: Vec<String> = report
        .files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert!(names[0].starts_with("WEB_ipam_org_br_focos-em-alta_corpus_"));
    assert!(names[1].starts_with("relatorio_fogo_corpus_"));

    for file in &report.files {
        for line in read_lines(file) {
            assert_eq!(gate::accept(&line).as_deref(), Some(line.as_str()));
        }
    }

    let output = final_dir.path().join("corpus.txt");
    let compiled = compile(sentences.path(), &output, &CompileOptions::default()).unwrap();
    assert_eq!(compiled.files_processed, 2);

    let corpus = read_lines(&output);
    assert_eq!(
        corpus,
        vec![
            "detectou 500 focos de incêndio na Amazônia.",
            "Os focos de calor aumentaram muito no Pantanal durante a seca.",
            "A brigada do Ibama combateu o incêndio na floresta por três dias.",
        ]
    );
    assert_eq!(compiled.kept, 3);
    assert_eq!(compiled.discarded, 1);
}

#[test]
fn test_compiled_corpus_invariants() {
    let input = TempDir::new().unwrap();
    let output = input.path().join("final").join("corpus.txt");

    write(
        input.path(),
        "a_corpus_20240101_000000.txt",
        "Queimadas aumentaram na Amazônia.\n\
         fogo\n\
         vide linha 13: Queimadas aumentaram 40% na Amazônia.\n\
         O mercado financeiro fechou em alta nesta semana.\n\
         A √°rea atingida pelo fogo cresceu no Cerrado.\n",
    );
    write(
        input.path(),
        "b_corpus_20240101_000000.txt",
        "Queimadas aumentaram na Amazônia.\n\
         O satélite AQUA registrou novos focos no Pantanal.\n",
    );

    let report = compile(input.path(), &output, &CompileOptions::default()).unwrap();
    let corpus = read_lines(&output);
    let keywords = DomainKeywords::default();

    assert_eq!(
        corpus,
        vec![
            "Queimadas aumentaram na Amazônia.",
            "A área atingida pelo fogo cresceu no Cerrado.",
            "O satélite AQUA registrou novos focos no Pantanal.",
        ]
    );
    for line in &corpus {
        assert!(line.chars().count() >= DEFAULT_MIN_LENGTH);
        assert!(keywords.matches(line));
        assert!(!line.contains("vide linha"));
    }
    let unique: HashSet<&String> = corpus.iter().collect();
    assert_eq!(unique.len(), corpus.len());

    assert_eq!(report.blocked, 1);
    assert_eq!(report.too_short, 1);
    assert_eq!(report.duplicates, 1);
    assert_eq!(report.discarded, 1);
    assert_eq!(report.kept, 3);
}

#[test]
fn test_compile_order_independent_of_creation_order() {
    let names: Vec<String> = (0..12)
        .map(|i| format!("DOC_{:02}_corpus_20240101_000000.txt", i))
        .collect();
    let expected: Vec<String> = (0..12)
        .map(|i| format!("O incêndio número {} atingiu a floresta nativa.", i))
        .collect();

    let mut corpora = Vec::new();
    for _ in 0..3 {
        let input = TempDir::new().unwrap();
        let mut order: Vec<usize> = (0..names.len()).collect();
        order.shuffle(&mut rand::thread_rng());
        for i in order {
            write(
                input.path(),
                &names[i],
                &format!("{}\nO fogo voltou ao Cerrado neste ano.\n", expected[i]),
            );
        }

        let output = input.path().join("corpus.out");
        compile(input.path(), &output, &CompileOptions::default()).unwrap();
        corpora.push(read_lines(&output));
    }

    assert_eq!(corpora[0], corpora[1]);
    assert_eq!(corpora[1], corpora[2]);
    assert_eq!(corpora[0][0], expected[0]);
    assert_eq!(corpora[0][1], "O fogo voltou ao Cerrado neste ano.");
    assert_eq!(corpora[0][2..], expected[1..]);
}

#[test]
fn test_compile_missing_input_dir() {
    let dir = TempDir::new().unwrap();
    let err = compile(
        dir.path().join("nao-existe"),
        dir.path().join("corpus.txt"),
        &CompileOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::MissingInput(_)));
}

#[test]
fn test_custom_keywords() {
    let input = TempDir::new().unwrap();
    let keywords_file = input.path().join("keywords.cfg");
    fs::write(&keywords_file, "# vocabulário\nseca\n").unwrap();
    write(
        input.path(),
        "a_corpus_20240101_000000.txt",
        "A seca prolongada afetou o Nordeste.\nO fogo voltou ao Cerrado neste ano.\n",
    );

    let options =
        CompileOptions::default().with_keywords(DomainKeywords::from_file(&keywords_file).unwrap());
    let output = input.path().join("out").join("corpus.txt");
    compile(input.path(), &output, &options).unwrap();
    assert_eq!(read_lines(&output), vec!["A seca prolongada afetou o Nordeste."]);
}
