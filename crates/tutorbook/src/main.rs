//! `tutorbook` - CLI for the tutoring record book
//!
//! This binary is the presentation layer: it parses commands, drives the
//! [`Store`] and prints the derived views.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, BufRead, Write};

use chrono::{Local, NaiveDate, Utc};
use clap::Parser;
use tracing::debug;

use tutorbook::backup::{backup_file_name, export_payload, parse_import};
use tutorbook::cli::{
    BackupCommand, Cli, Command, ConfigCommand, ListCommand, RecordCommand, RemindersCommand,
    ReportCommand, SettingsCommand, StatsCommand, StudentCommand,
};
use tutorbook::model::record::parse_date;
use tutorbook::model::{SettingsPatch, Student};
use tutorbook::report::build_report;
use tutorbook::views::{
    reminders, student_listing, subject_options, summarize, window_range, StudentFilter,
    StudentSummary,
};
use tutorbook::{init_logging, logo, Config, Error, Storage, Store};

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Shown for an empty value.
const PLACEHOLDER: &str = "—";

fn main() -> CliResult {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
        Command::Status(status_cmd) => handle_status(&config, status_cmd.json),
        command => {
            let mut store = open_store(&config)?;
            match command {
                Command::Student(cmd) => handle_student(&mut store, cmd),
                Command::Record(cmd) => handle_record(&mut store, cmd),
                Command::List(cmd) => handle_list(&store, &config, &cmd),
                Command::Stats(cmd) => handle_stats(&store, &config, &cmd),
                Command::Report(cmd) => handle_report(&store, &config, &cmd),
                Command::Reminders(cmd) => handle_reminders(&store, &cmd),
                Command::Settings(cmd) => handle_settings(&mut store, &config, cmd),
                Command::Backup(cmd) => handle_backup(&mut store, &config, cmd),
                Command::Config(_) | Command::Status(_) => Ok(()),
            }
        }
    }
}

fn open_storage(config: &Config) -> Result<Storage, Error> {
    Ok(Storage::open(config.database_path())?.with_slot_key(config.storage.slot_key.clone()))
}

fn open_store(config: &Config) -> Result<Store, Error> {
    Ok(Store::open(open_storage(config)?))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Find a student by id, or else by an exact, unique name.
fn resolve_student<'a>(store: &'a Store, key: &str) -> Result<&'a Student, Error> {
    if let Some(student) = store.student(key) {
        return Ok(student);
    }

    let key = key.trim();
    let mut named = store.students().iter().filter(|s| s.name == key);
    match (named.next(), named.next()) {
        (Some(student), None) => Ok(student),
        (Some(_), Some(_)) => Err(Error::validation(
            "student",
            format!("several students are named `{key}`, use the id instead"),
        )),
        (None, _) => Err(Error::StudentNotFound(key.to_string())),
    }
}

fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn or_placeholder(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or(PLACEHOLDER)
}

fn student_heading(student: &Student) -> String {
    let subjects = student.subjects_label(" / ");
    let details: Vec<&str> = [student.school.as_str(), subjects.as_str()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    if details.is_empty() {
        student.name.clone()
    } else {
        format!("{}  ({})", student.name, details.join(" · "))
    }
}

fn handle_student(store: &mut Store, cmd: StudentCommand) -> CliResult {
    match cmd {
        StudentCommand::Add { name, fields } => {
            let student = store.add_student(fields.into_draft(name))?;
            println!("Added student {} ({})", student.name, student.id);
        }
        StudentCommand::Edit {
            student,
            name,
            fields,
        } => {
            let id = resolve_student(store, &student)?.id.clone();
            let patch = fields.into_patch(name);
            if patch.is_empty() {
                println!("Nothing to change.");
                return Ok(());
            }
            store.update_student(id.as_str(), &patch)?;
            println!("Updated student {id}");
        }
        StudentCommand::Delete { student, yes } => {
            let target = resolve_student(store, &student)?;
            let prompt = format!(
                "Delete {} and {} record(s)?",
                target.name,
                target.records.len()
            );
            let id = target.id.clone();
            if !yes && !confirm(&prompt)? {
                println!("Cancelled.");
                return Ok(());
            }
            let removed = store.delete_student(id.as_str())?;
            println!("Deleted student {}", removed.name);
        }
        StudentCommand::Show { student, json } => {
            let student = resolve_student(store, &student)?;
            if json {
                println!("{}", serde_json::to_string_pretty(student)?);
            } else {
                println!("{}", student_heading(student));
                println!("id: {}", student.id);
                println!("記錄 {} 筆", student.records.len());
                for record in &student.records {
                    print_record(record, true);
                }
            }
        }
    }
    Ok(())
}

fn print_record(record: &tutorbook::Record, detailed: bool) {
    println!(
        "  {} {}  {}  {}  [{}]",
        or_placeholder(Some(record.date.as_str())),
        or_placeholder(record.time.as_deref()),
        record
            .homework_status
            .map_or(PLACEHOLDER, tutorbook::HomeworkStatus::label),
        or_placeholder(record.weekly_score.as_deref()),
        record.id
    );
    if detailed {
        let fields = [
            ("科目", record.subject.as_deref()),
            ("授課進度", record.progress.as_deref()),
            ("下次作業範圍", record.next_homework.as_deref()),
            ("上課狀況", record.class_condition.as_deref()),
            ("學習進度與家長溝通", record.parent_communication.as_deref()),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                println!("      {label}：{value}");
            }
        }
    }
}

fn handle_record(store: &mut Store, cmd: RecordCommand) -> CliResult {
    match cmd {
        RecordCommand::Add { student, fields } => {
            let id = resolve_student(store, &student)?.id.clone();
            let record = store.add_record(id.as_str(), fields.into_draft(today()))?;
            println!("Added record {} on {}", record.id, record.date);
        }
        RecordCommand::Edit {
            student,
            record,
            fields,
            clear_status,
        } => {
            let id = resolve_student(store, &student)?.id.clone();
            let patch = fields.into_patch(clear_status);
            if patch.is_empty() {
                println!("Nothing to change.");
                return Ok(());
            }
            store.update_record(id.as_str(), &record, &patch)?;
            println!("Updated record {record}");
        }
        RecordCommand::Delete { student, record } => {
            let id = resolve_student(store, &student)?.id.clone();
            store.delete_record(id.as_str(), &record)?;
            println!("Deleted record {record}");
        }
    }
    Ok(())
}

fn print_summary(summary: &StudentSummary<'_>, window_days: u64) {
    let span = window_days + 1;
    println!("{}", student_heading(summary.student));
    println!("  id: {}", summary.student.id);

    let homework: Vec<String> = summary
        .window_homework
        .iter()
        .map(|(status, count)| format!("{} {count}", status.label()))
        .collect();
    println!("  近 {span} 日作業：{}", homework.join(" · "));

    match summary.window_scores.average {
        Some(average) => println!(
            "  近 {span} 日週考平均：{average}（{} 次）",
            summary.window_scores.count
        ),
        None => println!("  近 {span} 日週考平均：{PLACEHOLDER}"),
    }

    println!("  記錄 {} 筆", summary.record_count);
    for record in &summary.recent {
        print_record(record, false);
    }
}

fn handle_list(store: &Store, config: &Config, cmd: &ListCommand) -> CliResult {
    if cmd.subjects {
        let options = subject_options(store.students());
        if cmd.json {
            println!("{}", serde_json::to_string_pretty(&options)?);
        } else {
            for subject in options {
                println!("{subject}");
            }
        }
        return Ok(());
    }

    let filter = StudentFilter {
        query: cmd.query.clone().unwrap_or_default(),
        subject: cmd.subject.clone(),
    };
    let listing = student_listing(
        store.students(),
        &filter,
        today(),
        config.window_days(),
        config.views.list_records,
    );
    debug!(shown = listing.shown, total = listing.total, "Student list built");

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!("{}", store.settings().academy_name);
    println!("顯示 {} / {} 位學生", listing.shown, listing.total);
    for summary in &listing.students {
        println!();
        print_summary(summary, config.window_days());
    }
    Ok(())
}

fn handle_stats(store: &Store, config: &Config, cmd: &StatsCommand) -> CliResult {
    let today = match &cmd.today {
        Some(value) => parse_date(value).ok_or_else(|| {
            Error::validation("today", format!("`{value}` is not a YYYY-MM-DD date"))
        })?,
        None => today(),
    };
    let students: Vec<&Student> = match &cmd.student {
        Some(key) => vec![resolve_student(store, key)?],
        None => store.students().iter().collect(),
    };
    let window = window_range(today, config.window_days());
    let summaries: Vec<StudentSummary<'_>> = students
        .into_iter()
        .map(|s| summarize(s, today, config.window_days(), 0))
        .collect();

    if cmd.json {
        let stats: Vec<_> = summaries
            .iter()
            .map(|s| {
                serde_json::json!({
                    "id": s.student.id,
                    "name": s.student.name,
                    "homework": s.window_homework,
                    "scores": s.window_scores,
                })
            })
            .collect();
        let out = serde_json::json!({
            "window": { "start": window.start, "end": window.end },
            "students": stats,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("期間：{} ~ {}", window.start, window.end);
    for summary in &summaries {
        println!();
        println!("{}", summary.student.name);
        for (status, count) in summary.window_homework.iter() {
            println!("  {:<6} {count}", status.label());
        }
        match summary.window_scores.average {
            Some(average) => println!(
                "  週考平均 {average}（{} 次）",
                summary.window_scores.count
            ),
            None => println!("  週考平均 {PLACEHOLDER}"),
        }
    }
    Ok(())
}

fn handle_report(store: &Store, config: &Config, cmd: &ReportCommand) -> CliResult {
    let student = resolve_student(store, &cmd.student)?;
    let limit = cmd.limit.unwrap_or(config.views.latest_limit);

    let Some(report) = build_report(student, store.settings(), Local::now().naive_local(), limit)
    else {
        println!("目前沒有可匯出的記錄");
        return Ok(());
    };

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.render_text());
        println!();
        println!("File name: {}", report.file_name);
    }
    Ok(())
}

fn handle_reminders(store: &Store, cmd: &RemindersCommand) -> CliResult {
    let items = reminders(store.students());

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("尚無學生資料");
        return Ok(());
    }

    for item in &items {
        println!("{}", student_heading(item.student));
        println!(
            "  最近上課：{}",
            or_placeholder(item.latest.map(|r| r.date.as_str()))
        );
        println!(
            "  下次作業：{}",
            item.latest
                .and_then(|r| r.next_homework.as_deref())
                .unwrap_or("尚未填寫")
        );
    }
    Ok(())
}

fn handle_settings(store: &mut Store, config: &Config, cmd: SettingsCommand) -> CliResult {
    if let Some(patch) = cmd.set_patch() {
        if patch.is_empty() {
            println!("Nothing to change.");
            return Ok(());
        }
        store.update_settings(patch)?;
        println!("Settings saved.");
        return Ok(());
    }

    match cmd {
        SettingsCommand::Show { json } => {
            let settings = store.settings();
            if json {
                println!("{}", serde_json::to_string_pretty(settings)?);
            } else {
                println!("Academy:  {}", settings.academy_name);
                println!(
                    "Teacher:  {}",
                    or_placeholder(settings.teacher_name.as_deref())
                );
                match &settings.logo_data_url {
                    Some(url) => println!("Logo:     set ({} bytes)", url.len()),
                    None => println!("Logo:     {PLACEHOLDER}"),
                }
            }
        }
        SettingsCommand::Logo { file } => {
            let url = logo::load_logo(&file, config.settings.max_logo_bytes)?;
            store.update_settings(SettingsPatch {
                logo_data_url: Some(url),
                ..SettingsPatch::default()
            })?;
            println!("Logo set from {}", file.display());
        }
        SettingsCommand::RemoveLogo => {
            store.update_settings(SettingsPatch {
                logo_data_url: Some(String::new()),
                ..SettingsPatch::default()
            })?;
            println!("Logo removed.");
        }
        SettingsCommand::Set { .. } => {}
    }
    Ok(())
}

fn handle_backup(store: &mut Store, config: &Config, cmd: BackupCommand) -> CliResult {
    match cmd {
        BackupCommand::Export { output } => {
            let now = Utc::now();
            let text = export_payload(store.state(), now)?;
            let path = output
                .unwrap_or_else(|| config.export_dir().join(backup_file_name(now.date_naive())));
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                        path: parent.to_path_buf(),
                        source,
                    })?;
                }
            }
            std::fs::write(&path, text)?;
            println!(
                "Exported {} student(s) to {}",
                store.students().len(),
                path.display()
            );
        }
        BackupCommand::Import { file, yes } => {
            let text = std::fs::read_to_string(&file)?;
            let payload = parse_import(&text)?;
            let prompt = format!(
                "Replace {} student(s) with {} from {}?",
                store.students().len(),
                payload.students.len(),
                file.display()
            );
            if !yes && !confirm(&prompt)? {
                println!("Cancelled.");
                return Ok(());
            }
            store.import_data(payload);
            println!("匯入完成");
        }
    }
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> CliResult {
    let storage = open_storage(config)?;
    let stats = storage.stats()?;
    let state = storage.load();

    if json {
        let status = serde_json::json!({
            "database_path": storage.path(),
            "slot_key": storage.slot_key(),
            "slot_bytes": stats.slot_bytes,
            "database_bytes": stats.db_size_bytes,
            "last_saved": stats.last_saved,
            "students": state.students.len(),
            "records": state.record_count(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("tutorbook status");
        println!("----------------");
        println!("Database:      {}", storage.path().display());
        println!("Slot:          {}", storage.slot_key());
        println!("Data size:     {} bytes", stats.slot_bytes);
        println!("Database size: {} bytes", stats.db_size_bytes);
        match stats.last_saved {
            Some(at) => println!("Last saved:    {}", at.with_timezone(&Local).format("%Y-%m-%d %H:%M")),
            None => println!("Last saved:    never"),
        }
        println!("Students:      {}", state.students.len());
        println!("Records:       {}", state.record_count());
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> CliResult {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Slot key:           {}", config.storage.slot_key);
                println!();
                println!("[Views]");
                println!("  Window days:        {}", config.views.window_days);
                println!("  Latest limit:       {}", config.views.latest_limit);
                println!("  List records:       {}", config.views.list_records);
                println!();
                println!("[Backup]");
                println!("  Export directory:   {}", config.export_dir().display());
                println!();
                println!("[Settings]");
                println!("  Max logo bytes:     {}", config.settings.max_logo_bytes);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
