use crate::{
    compiler::{compile, CompileOptions, CompileReport},
    gate, narrative,
    segment::{RuleSegmenter, Segmenter},
    SourceType,
};
use pyo3::prelude::*;
use std::path::PathBuf;

fn value_error(e: impl ToString) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string())
}

fn parse_source_type(source_type: &str) -> PyResult<SourceType> {
    source_type.parse::<SourceType>().map_err(value_error)
}

#[pyclass(name = "CompileReport")]
#[derive(Clone)]
struct PyCompileReport {
    inner: CompileReport,
}

#[pymethods]
impl PyCompileReport {
    #[getter]
    fn files_processed(&self) -> usize {
        self.inner.files_processed
    }

    #[getter]
    fn discarded(&self) -> usize {
        self.inner.discarded
    }

    #[getter]
    fn kept(&self) -> usize {
        self.inner.kept
    }

    #[getter]
    fn word_count(&self) -> usize {
        self.inner.word_count
    }

    fn __str__(&self) -> String {
        self.inner.to_string()
    }
}

#[pyfunction]
#[pyo3(signature = (text, source_type="web_news"))]
fn clean_text(text: &str, source_type: &str) -> PyResult<String> {
    Ok(crate::clean_text(text, parse_source_type(source_type)?))
}

#[pyfunction]
#[pyo3(signature = (text, source_type="web_news"))]
fn extract_sentences(text: &str, source_type: &str) -> PyResult<Vec<String>> {
    Ok(crate::extract_sentences(text, parse_source_type(source_type)?))
}

#[pyfunction]
fn segment(text: &str) -> Vec<String> {
    RuleSegmenter::new().segment(text)
}

#[pyfunction]
fn accept_sentence(sentence: &str) -> Option<String> {
    gate::accept(sentence)
}

#[pyfunction]
fn is_narrative(line: &str) -> bool {
    narrative::is_narrative(line)
}

#[pyfunction]
#[pyo3(signature = (input_dir, output, min_length=None))]
fn compile_corpus(
    input_dir: PathBuf,
    output: PathBuf,
    min_length: Option<usize>,
) -> PyResult<PyCompileReport> {
    let mut options = CompileOptions::default();
    if let Some(min_length) = min_length {
        options = options.with_min_length(min_length);
    }
    let report = compile(&input_dir, &output, &options).map_err(value_error)?;
    Ok(PyCompileReport { inner: report })
}

#[pymodule]
fn _descreve(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyCompileReport>()?;
    m.add_function(wrap_pyfunction!(clean_text, m)?)?;
    m.add_function(wrap_pyfunction!(extract_sentences, m)?)?;
    m.add_function(wrap_pyfunction!(segment, m)?)?;
    m.add_function(wrap_pyfunction!(accept_sentence, m)?)?;
    m.add_function(wrap_pyfunction!(is_narrative, m)?)?;
    m.add_function(wrap_pyfunction!(compile_corpus, m)?)?;

    Ok(())
}
