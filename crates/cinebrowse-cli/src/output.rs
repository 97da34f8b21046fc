use catalog_models::{Country, Genre, Season, Title};
use clap::ValueEnum;
use comfy_table::{presets, modifiers, Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        self.message("success", "✓".green().to_string(), msg.as_ref());
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        self.message("info", String::new(), msg.as_ref());
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        self.message("warning", "⚠".yellow().to_string(), msg.as_ref());
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        // Errors should always be shown, even in quiet mode
        match self.format {
            OutputFormat::Human => eprintln!("{} {}", "✗".red(), msg.as_ref()),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({ "type": "error", "message": msg.as_ref() }));
            }
        }
    }

    fn message(&self, kind: &str, marker: String, msg: &str) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human if marker.is_empty() => println!("{}", msg),
            OutputFormat::Human => println!("{} {}", marker, msg),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({ "type": kind, "message": msg }));
            }
        }
    }

    /// Serialize any record list as `{ "type": kind, "items": [...] }`
    pub fn records<T: Serialize>(&self, kind: &str, items: &[T]) {
        if self.quiet && self.is_human() {
            return;
        }
        self.print_json(&json!({ "type": kind, "count": items.len(), "items": items }));
    }

    pub fn titles(&self, titles: &[Title]) {
        if !self.is_human() {
            self.records("titles", titles);
            return;
        }
        if self.quiet {
            return;
        }

        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
        table.set_header(vec![
            header("ID"),
            header("Title"),
            header("Type"),
            header("Year"),
            header("IMDb"),
            header("Duration"),
            header("Genres"),
            header("Sources"),
        ]);

        for title in titles {
            let genres: Vec<&str> = title.genres.iter().map(|g| g.title.as_str()).collect();
            table.add_row(vec![
                Cell::new(title.id),
                Cell::new(&title.title),
                Cell::new(title.kind),
                Cell::new(title.known_year().map(|y| y.to_string()).unwrap_or_else(|| "-".to_string())),
                Cell::new(format!("{:.1}", title.imdb)),
                Cell::new(title.duration.as_deref().unwrap_or("-")),
                Cell::new(genres.join(", ")),
                Cell::new(title.playable_sources().len()),
            ]);
        }

        println!("{}", table);
    }

    pub fn title_detail(&self, title: &Title) {
        if !self.is_human() {
            self.print_json(&json!({ "type": "title", "item": title }));
            return;
        }
        if self.quiet {
            return;
        }

        println!("{} {}", title.title.bright_cyan().bold(), format!("({})", title.kind).dimmed());
        if let Some(year) = title.known_year() {
            println!("Year: {}", year);
        }
        println!("IMDb: {:.1}", title.imdb);
        if let Some(duration) = &title.duration {
            println!("Duration: {}", duration);
        }
        if !title.description.is_empty() {
            println!("\n{}\n", title.description);
        }
        for source in title.playable_sources() {
            println!("  [{}] {} {}", source.quality, source.kind, source.url);
        }
    }

    pub fn seasons(&self, seasons: &[Season]) {
        if !self.is_human() {
            self.records("seasons", seasons);
            return;
        }
        if self.quiet {
            return;
        }

        for season in seasons {
            println!("{} {}", season.title.bright_cyan().bold(), format!("#{}", season.id).dimmed());
            for episode in &season.episodes {
                println!(
                    "  {:>6}  {}  {}  ({} source(s))",
                    episode.id,
                    episode.title,
                    episode.duration.as_deref().unwrap_or("-"),
                    episode.sources.len()
                );
            }
        }
    }

    pub fn genres(&self, genres: &[Genre]) {
        if !self.is_human() {
            self.records("genres", genres);
            return;
        }
        self.id_table(genres.iter().map(|g| (g.id, g.title.as_str())));
    }

    pub fn countries(&self, countries: &[Country]) {
        if !self.is_human() {
            self.records("countries", countries);
            return;
        }
        self.id_table(countries.iter().map(|c| (c.id, c.title.as_str())));
    }

    fn id_table<'a>(&self, rows: impl Iterator<Item = (i64, &'a str)>) {
        if self.quiet {
            return;
        }
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
        table.set_header(vec![header("ID"), header("Name")]);
        for (id, name) in rows {
            table.add_row(vec![Cell::new(id), Cell::new(name)]);
        }
        println!("{}", table);
    }

    pub fn json(&self, data: &serde_json::Value) {
        if self.quiet && self.is_human() {
            return;
        }
        self.print_json(data);
    }

    fn print_json(&self, data: &serde_json::Value) {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(data).unwrap_or_default());
            }
            OutputFormat::JsonPretty | OutputFormat::Human => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
            }
        }
    }
}

fn header(name: &str) -> Cell {
    Cell::new(name).fg(Color::Cyan).add_attribute(Attribute::Bold)
}
