//! The `wordselect init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("wordselect.toml").exists() {
        println!("wordselect.toml already exists, skipping.");
    } else {
        std::fs::write("wordselect.toml", SAMPLE_CONFIG)?;
        println!("Created wordselect.toml");
    }

    std::fs::create_dir_all("question-sets")?;
    let example_path = Path::new("question-sets/example.toml");
    if example_path.exists() {
        println!("question-sets/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_QUESTION_SET)?;
        println!("Created question-sets/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Mark the correct words in question-sets/example.toml");
    println!("  2. Run: wordselect validate --question-set question-sets/example.toml");
    println!("  3. Run: wordselect tokenize --question-set question-sets/example.toml --question cow");
    println!(
        "  4. Run: wordselect grade --question-set question-sets/example.toml --submissions submissions.json"
    );

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# wordselect configuration

# Delimiters marking correct words when a question set doesn't name its own.
default_delimiters = "[]"

# Fraction of a place's credit lost for each attempt after the first.
default_penalty = 0.3333333

# Grade consecutive identical attempts only once.
collapse_repeated_attempts = true

output_dir = "./wordselect-results"
"#;

const EXAMPLE_QUESTION_SET: &str = r#"[question_set]
id = "example"
name = "Example Question Set"
description = "A few select-the-words questions to get started"
default_delimiters = "[]"
default_penalty = 0.3333333

[[questions]]
id = "cow"
name = "Verbs and articles"
text = "The cow [jumped] over [the] moon"

[[questions]]
id = "nouns"
name = "Nouns"
text = "A {fox} chased the {hen} across the <b>{yard}</b>"
delimiters = "{}"

[[questions]]
id = "linked"
name = "Words inside a link are not selectable"
text = """
Read <a href="https://example.com">the whole article</a> on a [bright]
and [windy] day.
"""
penalty = 0.5
"#;
