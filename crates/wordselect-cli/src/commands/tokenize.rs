//! The `wordselect tokenize` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use wordselect_core::config::load_config_from;
use wordselect_core::parser::parse_question_set;
use wordselect_core::{DelimiterPair, Question};

pub fn execute(
    text: Option<String>,
    delimiters: String,
    question_set: Option<PathBuf>,
    question_id: Option<String>,
) -> Result<()> {
    let question = match (text, question_set, question_id) {
        (Some(text), _, _) => {
            let delimiters: DelimiterPair = delimiters.parse()?;
            Question::new("text", text).with_delimiters(delimiters)
        }
        (None, Some(path), Some(id)) => {
            let config = load_config_from(None)?;
            let set = parse_question_set(&path, &config.question_defaults())?;
            set.question(&id)
                .cloned()
                .with_context(|| format!("question '{id}' not found in {}", path.display()))?
        }
        _ => anyhow::bail!("either --text or --question-set with --question is required"),
    };

    let words = question.selectable_words();
    let unselectable = question.unselectable_words();

    let mut table = Table::new();
    table.set_header(vec!["Place", "Raw", "Display", "Correct", "Unselectable"]);
    for token in question.tokens() {
        let display = words.get(token.index).map(String::as_str).unwrap_or("");
        table.add_row(vec![
            Cell::new(format!("p{}", token.index)),
            Cell::new(&token.text),
            Cell::new(display),
            Cell::new(if token.is_correct { "yes" } else { "" }),
            Cell::new(if unselectable.contains_key(&token.index) { "yes" } else { "" }),
        ]);
    }
    println!("{table}");

    let places = question.correct_places();
    if places.is_empty() {
        println!(
            "No correct places for delimiters {}; responses cannot be graded.",
            question.delimiters
        );
    } else {
        let keys: Vec<String> = places.iter().map(|p| p.key()).collect();
        println!("Correct places: {}", keys.join(", "));
    }

    Ok(())
}
