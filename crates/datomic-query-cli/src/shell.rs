use anyhow::{Result, anyhow};
use datomic_query::{
    ApiClient, Error, config::Settings, submit::Submitter, validate::validate_json,
};
use rustyline::{DefaultEditor, error::ReadlineError};

const PROMPT: &str = "dq> ";

const HELP: &str = "\
Enter a query document as one line of JSON to validate and submit it.

  :validate <json>   check a document without submitting
  :translate <json>  show the server's translation of a document
  :help              show this text
  :quit              leave (also :q or Ctrl-D)";

///
/// Line
///

#[derive(Debug, Eq, PartialEq)]
enum Line<'a> {
    Blank,
    Help,
    Quit,
    Validate(&'a str),
    Translate(&'a str),
    Submit(&'a str),
    Unknown(&'a str),
}

impl<'a> Line<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Blank;
        }
        let Some(command) = line.strip_prefix(':') else {
            return Self::Submit(line);
        };

        let (name, rest) = command
            .split_once(char::is_whitespace)
            .map_or((command, ""), |(name, rest)| (name, rest.trim()));

        match name {
            "q" | "quit" => Self::Quit,
            "help" | "h" => Self::Help,
            "validate" | "v" => Self::Validate(rest),
            "translate" | "t" => Self::Translate(rest),
            _ => Self::Unknown(name),
        }
    }
}

pub async fn run(settings: &Settings) -> Result<()> {
    let client = ApiClient::from_settings(settings).map_err(Error::from)?;
    let mut editor = DefaultEditor::new().map_err(|err| anyhow!("failed to start shell: {err}"))?;

    println!("connected to {} (:help for commands)", settings.api_url);

    loop {
        let line = match editor.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(anyhow!("readline error: {err}")),
        };
        remember(&mut editor, &line);

        match Line::parse(&line) {
            Line::Blank => {}
            Line::Help => println!("{HELP}"),
            Line::Quit => break,
            Line::Unknown(name) => eprintln!("unknown command ':{name}' (try :help)"),
            Line::Validate(json) => match validate_json(json) {
                Ok(_) => println!("ok"),
                Err(err) => eprintln!("{}", Error::from(err)),
            },
            Line::Translate(json) => {
                if let Err(err) = translate(&client, json).await {
                    eprintln!("{err}");
                }
            }
            Line::Submit(json) => {
                if let Err(err) = submit(&client, json).await {
                    eprintln!("{err}");
                }
            }
        }
    }

    Ok(())
}

fn remember(editor: &mut DefaultEditor, line: &str) {
    if line.trim().is_empty() {
        return;
    }
    if let Err(err) = editor.add_history_entry(line) {
        tracing::debug!(error = %err, "failed to record shell history");
    }
}

async fn submit(client: &ApiClient, json: &str) -> Result<(), Error> {
    let document = validate_json(json)?;
    let response = client.submit(&document).await?;
    print_json(&response);

    Ok(())
}

async fn translate(client: &ApiClient, json: &str) -> Result<(), Error> {
    let document = validate_json(json)?;
    let response = client.translate(&document).await?;
    print_json(&response);

    Ok(())
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(_) => println!("{value}"),
    }
}
