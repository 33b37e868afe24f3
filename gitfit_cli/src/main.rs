use clap::{Parser, Subcommand, ValueEnum};
use gitfit_core::notes_csv::{notes_to_csv, parse_notes_csv};
use gitfit_core::presets::{apply_preset, Preset};
use gitfit_core::quick_fill::{fill_cycle, quick_fill_day, CycleKind, QuickFillOptions, WorkoutType};
use gitfit_core::regimen_io::{
    export_regimen_csv, export_regimen_json, parse_regimen_csv, parse_regimen_json, ParsedRegimen,
};
use gitfit_core::tips::tips_for_exercise;
use gitfit_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "gitfit")]
#[command(about = "GitFit local workout planner and progress log", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Favorite exercises
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },

    /// Progress notes
    Notes {
        #[command(subcommand)]
        action: NotesAction,
    },

    /// Weekly regimen plans (default: show the active plan)
    Plan {
        #[command(subcommand)]
        action: PlanAction,
    },

    /// Browse the exercise catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List favorites in the order they were added
    List,
    /// Add the exercise if absent, otherwise remove it
    Toggle { key: ExerciseKey },
    Add { key: ExerciseKey },
    Remove { key: ExerciseKey },
}

#[derive(Subcommand)]
enum NotesAction {
    /// List notes, newest first
    List {
        #[arg(long)]
        key: Option<ExerciseKey>,
    },
    /// Log a note for an exercise
    Add {
        key: ExerciseKey,
        #[arg(long, default_value = "")]
        text: String,
        /// Display name (defaults to the catalog name)
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        weight: Option<String>,
        #[arg(long)]
        reps: Option<String>,
        #[arg(long)]
        sets: Option<String>,
    },
    /// Edit a note by id; an empty value clears a numeric field
    Edit {
        id: String,
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        weight: Option<String>,
        #[arg(long)]
        reps: Option<String>,
        #[arg(long)]
        sets: Option<String>,
    },
    /// Delete one note by id, or every note of a `slug:id` exercise
    Delete { target: String },
    /// Delete every note of an exercise
    Clear { key: ExerciseKey },
    /// Export all notes as CSV
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Import notes from CSV
    Import {
        file: PathBuf,
        /// replaceAll, skipDuplicates or append
        #[arg(long)]
        strategy: Option<NotesImportStrategy>,
    },
}

#[derive(Subcommand)]
enum PlanAction {
    /// Show the active plan
    Show,
    /// List all plans
    List,
    /// Create an empty plan and make it active
    New { name: String },
    /// Copy the active plan and make the copy active
    Duplicate {
        #[arg(long)]
        name: Option<String>,
    },
    Rename { id: String, name: String },
    Delete { id: String },
    /// Make a plan active
    Use { id: String },
    /// Add a catalog exercise to a day of the active plan
    Add {
        key: ExerciseKey,
        #[arg(long, default_value = "Unassigned")]
        day: String,
        /// Append instead of inserting at the top
        #[arg(long)]
        bottom: bool,
        #[arg(long)]
        sets: Option<String>,
        #[arg(long)]
        reps: Option<String>,
        #[arg(long)]
        weight: Option<String>,
    },
    /// Move an item to another position or day
    Move {
        from_day: DayKey,
        from_index: usize,
        to_day: DayKey,
        to_index: usize,
    },
    /// Swap an item with its neighbour
    Reorder {
        day: DayKey,
        index: usize,
        direction: Direction,
    },
    Remove { day: DayKey, index: usize },
    /// Empty one day, or the whole plan
    Clear {
        #[arg(long)]
        day: Option<DayKey>,
    },
    /// Add a random workout to one day
    Fill {
        workout: WorkoutType,
        #[arg(long, default_value = "Monday")]
        day: DayKey,
        /// Keep exercises that are already in the day
        #[arg(long)]
        allow_duplicates: bool,
    },
    /// Replace the active plan with a preset (ppl, upper-lower, bro5, cali3, pl3)
    Preset { preset: Preset },
    /// Fill six consecutive days with a workout cycle (ppl, pl, cal)
    Cycle {
        kind: CycleKind,
        #[arg(long, default_value = "Monday")]
        start: DayKey,
        #[arg(long)]
        allow_duplicates: bool,
    },
    /// Export every plan
    Export {
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Import plans from JSON or CSV
    Import {
        file: PathBuf,
        /// Inferred from the file extension when omitted
        #[arg(long, value_enum)]
        format: Option<Format>,
        /// append, replaceAll or replaceActive
        #[arg(long)]
        strategy: Option<RegimenImportStrategy>,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List categories, or the exercises of one category
    List { slug: Option<String> },
    /// Show one exercise with tips
    Show { key: ExerciseKey },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Csv,
}

impl Format {
    fn infer(path: &Path) -> Format {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Format::Csv,
            _ => Format::Json,
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    gitfit_core::logging::init();

    let cli = Cli::parse();

    // Determine data directory
    let config = Config::load()?;
    let data_dir = cli.data_dir.clone().unwrap_or_else(|| config.data.data_dir.clone());
    let storage = FileStorage::new(data_dir);

    match cli.command {
        Some(Commands::Favorites { action }) => cmd_favorites(&storage, action),
        Some(Commands::Notes { action }) => cmd_notes(&storage, &config, action),
        Some(Commands::Plan { action }) => cmd_plan(&storage, &config, action),
        Some(Commands::Catalog { action }) => cmd_catalog(&storage, &config, action),
        None => cmd_plan(&storage, &config, PlanAction::Show),
    }
}

fn load_catalog(config: &Config) -> Result<StaticCatalog> {
    match &config.catalog.path {
        Some(path) => StaticCatalog::load_from(path),
        None => Ok(get_default_catalog().clone()),
    }
}

fn write_output(out: Option<&Path>, contents: &str) -> Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, contents)?;
            eprintln!("Wrote {}", path.display());
        }
        None => print!("{}", contents),
    }
    Ok(())
}

fn report_errors(errors: &[String]) {
    for error in errors {
        eprintln!("  ! {}", error);
    }
}

// ============================================================================
// Favorites
// ============================================================================

fn cmd_favorites(storage: &FileStorage, action: FavoritesAction) -> Result<()> {
    let store = FavoritesStore::new(storage);

    match action {
        FavoritesAction::List => {
            let favorites = store.get_favorites()?;
            if favorites.is_empty() {
                println!("No favorites.");
            }
            for key in favorites {
                println!("{}", key);
            }
        }
        FavoritesAction::Toggle { key } => {
            let favorites = store.toggle_favorite(&key)?;
            if favorites.contains(&key) {
                println!("★ Added {}", key);
            } else {
                println!("Removed {}", key);
            }
        }
        FavoritesAction::Add { key } => {
            store.add_favorite(&key)?;
            println!("★ Added {}", key);
        }
        FavoritesAction::Remove { key } => {
            store.remove_favorite(&key)?;
            println!("Removed {}", key);
        }
    }

    Ok(())
}

// ============================================================================
// Notes
// ============================================================================

fn cmd_notes(storage: &FileStorage, config: &Config, action: NotesAction) -> Result<()> {
    let store = NotesStore::new(storage);

    match action {
        NotesAction::List { key } => {
            let notes = match &key {
                Some(key) => store.list_notes_for(key)?,
                None => store.list_all_notes()?,
            };
            if notes.is_empty() {
                println!("No notes.");
            }
            for note in &notes {
                display_note(note);
            }
        }

        NotesAction::Add {
            key,
            text,
            name,
            weight,
            reps,
            sets,
        } => {
            let name = match name {
                Some(name) => Some(name),
                None => load_catalog(config)?.lookup(&key).map(|e| e.name.clone()),
            };
            let input = NewNote {
                key: Some(key),
                exercise_name: name,
                text,
                weight,
                reps,
                sets,
            };
            if input.is_blank() {
                eprintln!("Nothing to save: give --text or a numeric field.");
                return Ok(());
            }
            let notes = store.add_note(input)?;
            if let Some(note) = notes.first() {
                println!("✓ Added note {}", note.id);
            }
        }

        NotesAction::Edit {
            id,
            text,
            name,
            weight,
            reps,
            sets,
        } => {
            let exists = store.list_all_notes()?.iter().any(|n| n.id == id);
            if !exists {
                println!("No note with id {}", id);
                return Ok(());
            }
            store.update_note(
                &id,
                NotePatch {
                    exercise_name: name,
                    text,
                    weight,
                    reps,
                    sets,
                },
            )?;
            println!("✓ Updated note {}", id);
        }

        NotesAction::Delete { target } => {
            let before = store.list_all_notes()?.len();
            let after = store.delete_note(&target)?.len();
            println!("✓ Deleted {} note(s)", before - after);
        }

        NotesAction::Clear { key } => {
            let before = store.list_all_notes()?.len();
            let after = store.clear_notes_for(&key)?.len();
            println!("✓ Cleared {} note(s) for {}", before - after, key);
        }

        NotesAction::Export { out } => {
            let csv = notes_to_csv(&store.list_all_notes()?)?;
            write_output(out.as_deref(), &csv)?;
        }

        NotesAction::Import { file, strategy } => {
            let text = std::fs::read_to_string(&file)?;
            let parsed = parse_notes_csv(&text);
            report_errors(&parsed.errors);
            if parsed.rows.is_empty() && !parsed.errors.is_empty() {
                return Err(Error::Import(format!("No notes imported from {}", file.display())));
            }

            let strategy = strategy.unwrap_or(config.import.notes_strategy);
            let count = parsed.rows.len();
            let notes = store.import_notes(parsed.rows, strategy)?;
            println!(
                "✓ Imported {} row(s) with {} ({} note(s) stored, {} rejected)",
                count,
                strategy,
                notes.len(),
                parsed.errors.len()
            );
        }
    }

    Ok(())
}

fn display_note(note: &Note) {
    let mut numbers = Vec::new();
    if let Some(sets) = note.sets {
        numbers.push(format!("{} sets", sets));
    }
    if let Some(reps) = note.reps {
        numbers.push(format!("{} reps", reps));
    }
    if let Some(weight) = note.weight {
        numbers.push(format!("@ {}", weight));
    }

    println!(
        "{}  {}  {} ({})",
        note.id,
        note.created_at.format("%Y-%m-%d %H:%M"),
        note.exercise_name,
        note.key
    );
    if !numbers.is_empty() {
        println!("    {}", numbers.join(", "));
    }
    if !note.text.is_empty() {
        for line in note.text.lines() {
            println!("    {}", line);
        }
    }
}

// ============================================================================
// Regimen
// ============================================================================

fn cmd_plan(storage: &FileStorage, config: &Config, action: PlanAction) -> Result<()> {
    let store = RegimenStore::new(storage);

    match action {
        PlanAction::Show => display_plan(store.read()?.active_plan()),

        PlanAction::List => {
            let root = store.read()?;
            let active = root.active_plan().id.clone();
            for plan in root.plans() {
                let marker = if plan.id == active { "*" } else { " " };
                println!(
                    "{} {}  {} ({} items)",
                    marker,
                    plan.id,
                    plan.name,
                    plan.days.total_items()
                );
            }
        }

        PlanAction::New { name } => {
            let root = store.create_plan(&name)?;
            let plan = root.active_plan();
            println!("✓ Created plan {} ({})", plan.name, plan.id);
        }

        PlanAction::Duplicate { name } => {
            let root = store.duplicate_current_plan(name.as_deref())?;
            let plan = root.active_plan();
            println!("✓ Duplicated into {} ({})", plan.name, plan.id);
        }

        PlanAction::Rename { id, name } => {
            let root = store.rename_plan(&id, &name)?;
            match root.plan(&id) {
                Some(plan) => println!("✓ Plan {} is now {}", id, plan.name),
                None => println!("No plan with id {}", id),
            }
        }

        PlanAction::Delete { id } => {
            let existed = store.read()?.plan(&id).is_some();
            let root = store.delete_plan(&id)?;
            if existed {
                println!("✓ Deleted plan {}", id);
            } else {
                println!("No plan with id {}", id);
            }
            println!("  Active: {}", root.active_plan().name);
        }

        PlanAction::Use { id } => {
            let root = store.set_active_plan(&id)?;
            if root.active_plan().id == id {
                println!("✓ Active plan: {}", root.active_plan().name);
            } else {
                println!("No plan with id {}", id);
            }
        }

        PlanAction::Add {
            key,
            day,
            bottom,
            sets,
            reps,
            weight,
        } => {
            let catalog = load_catalog(config)?;
            let category = catalog
                .category(key.slug())
                .map(|c| c.name.clone())
                .unwrap_or_else(|| key.slug().to_string());
            let exercise = catalog.lookup(&key);
            if exercise.is_none() {
                eprintln!("Note: {} is not in the catalog", key);
            }
            let item = RegimenItem {
                slug: key.slug().to_string(),
                id: key.exercise_id().to_string(),
                name: exercise
                    .map(|e| e.name.clone())
                    .unwrap_or_else(|| key.exercise_id().to_string()),
                category,
                difficulty: exercise.map(|e| e.difficulty.clone()).unwrap_or_default(),
                sets: sets.as_deref().and_then(Target::from_input),
                reps: reps.as_deref().and_then(Target::from_input),
                weight: weight.as_deref().and_then(Target::from_input),
            };
            let day = DayKey::parse_or_unassigned(&day);
            store.add_exercise_to_day(item, day.as_str(), !bottom)?;
            println!("✓ Added {} to {}", key, day);
        }

        PlanAction::Move {
            from_day,
            from_index,
            to_day,
            to_index,
        } => {
            let root = store.move_item(from_day, from_index, to_day, to_index)?;
            display_plan(root.active_plan());
        }

        PlanAction::Reorder {
            day,
            index,
            direction,
        } => {
            let root = store.reorder_item(day, index, direction)?;
            display_plan(root.active_plan());
        }

        PlanAction::Remove { day, index } => {
            let root = store.remove_item(day, index)?;
            display_plan(root.active_plan());
        }

        PlanAction::Clear { day } => {
            match day {
                Some(day) => {
                    store.clear_day(day)?;
                    println!("✓ Cleared {}", day);
                }
                None => {
                    store.clear_plan()?;
                    println!("✓ Cleared all days");
                }
            }
        }

        PlanAction::Fill {
            workout,
            day,
            allow_duplicates,
        } => {
            let catalog = load_catalog(config)?;
            let options = quick_fill_options(config, allow_duplicates);
            let before = store.read()?.active_plan().days.get(day).len();
            let root = quick_fill_day(&store, &catalog, day, workout, options, &mut rand::thread_rng())?;
            let added = root.active_plan().days.get(day).len().saturating_sub(before);
            if added == 0 {
                println!("No new {} exercises added to {}", workout, day);
            } else {
                println!("✓ Added {} {} exercises to {}", added, workout, day);
            }
        }

        PlanAction::Preset { preset } => {
            let catalog = load_catalog(config)?;
            let root = apply_preset(&store, &catalog, preset)?;
            println!(
                "✓ Applied {} ({} exercises)",
                preset,
                root.active_plan().days.total_items()
            );
            display_plan(root.active_plan());
        }

        PlanAction::Cycle {
            kind,
            start,
            allow_duplicates,
        } => {
            let catalog = load_catalog(config)?;
            let options = quick_fill_options(config, allow_duplicates);
            let root = fill_cycle(&store, &catalog, start, kind, options, &mut rand::thread_rng())?;
            println!("✓ Filled a 6-day cycle starting {}", start);
            display_plan(root.active_plan());
        }

        PlanAction::Export { format, out } => {
            let root = store.read()?;
            let text = match format {
                Format::Json => export_regimen_json(&root)?,
                Format::Csv => export_regimen_csv(&root)?,
            };
            write_output(out.as_deref(), &text)?;
        }

        PlanAction::Import {
            file,
            format,
            strategy,
        } => {
            let text = std::fs::read_to_string(&file)?;
            let ParsedRegimen { regimen, errors } = match format.unwrap_or_else(|| Format::infer(&file)) {
                Format::Json => parse_regimen_json(&text),
                Format::Csv => parse_regimen_csv(&text),
            };
            report_errors(&errors);
            if regimen.plans.is_empty() && !errors.is_empty() {
                return Err(Error::Import(format!("No plans imported from {}", file.display())));
            }

            let strategy = strategy.unwrap_or(config.import.regimen_strategy);
            let count = regimen.plans.len();
            let root = store.import_plans(regimen, strategy)?;
            println!(
                "✓ Imported {} plan(s) with {} ({} plan(s) stored)",
                count,
                strategy,
                root.plans().len()
            );
        }
    }

    Ok(())
}

fn quick_fill_options(config: &Config, allow_duplicates: bool) -> QuickFillOptions {
    let mut options = config.quick_fill.options();
    if allow_duplicates {
        options.skip_duplicates = false;
    }
    options
}

fn display_plan(plan: &RegimenPlan) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", plan.name);
    println!("╰─────────────────────────────────────────╯");
    println!("  id: {}", plan.id);

    for (day, items) in plan.days.iter() {
        println!();
        println!("  {}", day);
        if items.is_empty() {
            println!("    -");
        }
        for (i, item) in items.iter().enumerate() {
            let mut targets = Vec::new();
            if let Some(ref sets) = item.sets {
                targets.push(format!("{} sets", sets));
            }
            if let Some(ref reps) = item.reps {
                targets.push(format!("{} reps", reps));
            }
            if let Some(ref weight) = item.weight {
                targets.push(format!("@ {}", weight));
            }
            let difficulty = if item.difficulty.is_empty() {
                String::new()
            } else {
                format!(" [{}]", item.difficulty)
            };
            println!(
                "    {}. {} ({}){}{}",
                i,
                item.name,
                item.key_string(),
                difficulty,
                if targets.is_empty() {
                    String::new()
                } else {
                    format!("  {}", targets.join(", "))
                }
            );
        }
    }
    println!();
}

// ============================================================================
// Catalog
// ============================================================================

fn cmd_catalog(storage: &FileStorage, config: &Config, action: CatalogAction) -> Result<()> {
    let catalog = load_catalog(config)?;

    match action {
        CatalogAction::List { slug: None } => {
            for category in catalog.categories() {
                println!(
                    "{:<14} {} ({} exercises)",
                    category.slug,
                    category.name,
                    catalog.exercises(&category.slug).len()
                );
            }
        }

        CatalogAction::List { slug: Some(slug) } => {
            if catalog.category(&slug).is_none() {
                return Err(Error::Other(format!("Unknown category: {}", slug)));
            }
            for exercise in catalog.get_exercises(&slug) {
                println!(
                    "{}:{}  {}  [{}]",
                    slug, exercise.id, exercise.name, exercise.difficulty
                );
            }
        }

        CatalogAction::Show { key } => {
            let exercise = catalog
                .lookup(&key)
                .ok_or_else(|| Error::Other(format!("Unknown exercise: {}", key)))?;
            let favorite = FavoritesStore::new(storage).is_favorite(&key)?;

            println!();
            println!("  {}{}", exercise.name, if favorite { "  ★" } else { "" });
            println!("  {}  [{}]", key, exercise.difficulty);
            if !exercise.muscles.is_empty() {
                println!("  Muscles: {}", exercise.muscles.join(", "));
            }
            if !exercise.equipment.is_empty() {
                println!("  Equipment: {}", exercise.equipment);
            }
            if !exercise.description.is_empty() {
                println!();
                println!("  {}", exercise.description);
            }
            let tips = tips_for_exercise(exercise, key.slug());
            if !tips.is_empty() {
                println!();
                println!("  Tips:");
                for tip in tips {
                    println!("   • {}", tip);
                }
            }
            println!();
        }
    }

    Ok(())
}
