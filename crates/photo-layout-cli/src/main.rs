mod logger;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use logger::CliLogger;
use photo_layout::{
    CropEngine, ExportOptions, ImageRaster, InsertPosition, Layout, Orientation, PaperSize, Photo,
    PhotoId, Project, RasterBackend, Rect, Sections, Size, SortKey, TextField, parse_number,
    parse_page_number,
};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "phl", about = "Photo layout CLI", version)]
struct Cli {
    /// Project file
    #[arg(short, long, global = true, default_value = "project.json")]
    project: PathBuf,

    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty project
    New {
        /// Global layout: 1, 2, 4, 1text or 2text
        #[arg(long, default_value = "4")]
        layout: String,

        /// Overwrite an existing project file
        #[arg(long)]
        force: bool,
    },

    /// Append image files as photos
    Add {
        #[arg(required = true, num_args = 1..)]
        images: Vec<PathBuf>,

        /// Insert before this 1-based photo position instead of appending
        #[arg(long)]
        at: Option<usize>,
    },

    /// List pages and their photos
    Pages {
        /// Only show this 1-based section
        #[arg(long)]
        section: Option<String>,

        /// Pages per section
        #[arg(long)]
        per_section: Option<String>,
    },

    /// Reorder all photos
    Sort {
        #[arg(value_enum, default_value = "name")]
        by: SortArg,
    },

    /// Remove photos
    Delete {
        /// 1-based photo positions
        #[arg(required = true, num_args = 1..)]
        photos: Vec<usize>,
    },

    /// Copy photos, each right after itself
    Duplicate {
        /// 1-based photo positions
        #[arg(required = true, num_args = 1..)]
        photos: Vec<usize>,
    },

    /// Insert an empty page
    InsertPage {
        /// start, end or a page number
        #[arg(default_value = "end")]
        position: String,
    },

    /// Copy a page right after itself
    DuplicatePage { page: String },

    /// Empty every slot of a page
    ClearPage { page: String },

    /// Change the global layout, or one page's layout with --page
    SetLayout {
        layout: String,

        #[arg(long)]
        page: Option<String>,
    },

    /// Drop a page's layout override
    ResetLayout { page: String },

    /// Set a page title, or the title of every page with --all
    SetTitle {
        title: String,

        #[arg(long, conflicts_with = "all")]
        page: Option<String>,

        #[arg(long)]
        all: bool,
    },

    /// Set the text shown under a photo in text layouts
    SetText {
        /// 1-based photo position
        photo: usize,
        text: String,
    },

    /// Rotate photos by a multiple of 90 degrees
    Rotate {
        /// 1-based photo positions
        #[arg(required = true, num_args = 1..)]
        photos: Vec<usize>,

        #[arg(long, default_value = "90", allow_hyphen_values = true)]
        degrees: i32,
    },

    /// Set the number printed on the first page
    StartPage { number: String },

    /// List occurrences of text in page titles and photo texts
    Find { query: String },

    /// Replace text in page titles and photo texts
    Replace {
        query: String,
        replacement: String,

        /// Only replace the first occurrence
        #[arg(long)]
        first: bool,
    },

    /// Crop a photo to a rectangle in image pixels
    Crop {
        /// 1-based photo position
        photo: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },

    /// Export the project to PDF
    Export {
        #[arg(short, long)]
        output: PathBuf,

        /// Export options JSON file
        #[arg(long)]
        options: Option<PathBuf>,

        #[arg(long, value_enum)]
        paper: Option<PaperArg>,

        #[arg(long, value_enum)]
        orientation: Option<OrientationArg>,

        #[arg(long)]
        no_page_numbers: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A4,
    Letter,
    Legal,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Name,
    Date,
    Size,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

impl From<PaperArg> for PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A4 => Self::A4,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
        }
    }
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => Self::Name,
            SortArg::Date => Self::Date,
            SortArg::Size => Self::Size,
        }
    }
}

impl From<OrientationArg> for Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Self::Portrait,
            OrientationArg::Landscape => Self::Landscape,
        }
    }
}

fn photo_at(project: &Project, position: usize) -> Result<Photo> {
    position
        .checked_sub(1)
        .and_then(|i| project.photos().get(i))
        .cloned()
        .with_context(|| format!("No photo at position {}", position))
}

fn photo_ids(project: &Project, positions: &[usize]) -> Result<BTreeSet<PhotoId>> {
    positions
        .iter()
        .map(|&position| photo_at(project, position).map(|p| p.id))
        .collect()
}

async fn load_photo(backend: &ImageRaster, path: &Path) -> Result<Photo> {
    let src = path.to_string_lossy().into_owned();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| src.clone());
    let size = backend
        .decode(&src)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let metadata = tokio::fs::metadata(path).await?;
    let modified = metadata
        .modified()
        .ok()
        .map(|t| chrono::DateTime::<chrono::Utc>::from(t).timestamp_millis());
    Ok(Photo::new(src, name)
        .with_size(size)
        .with_file_info(modified, Some(metadata.len())))
}

fn describe_field(project: &Project, field: &TextField) -> String {
    match field {
        TextField::PageTitle(page_index) => format!("title of page {}", page_index + 1),
        TextField::PhotoText(id) => match project.photo_index(id) {
            Some(i) => format!("text of photo {}", i + 1),
            None => format!("text of photo {}", id),
        },
    }
}

fn print_pages(project: &Project, section_only: bool) {
    let pages = if section_only {
        project.visible_pages()
    } else {
        project.pages()
    };
    println!(
        "{} photo(s), {} page(s), section {}/{}",
        project.photos().len(),
        project.total_pages(),
        project.sections().current(),
        project.total_sections()
    );
    for page in pages {
        let number = (project.start_page_number() as usize).saturating_add(page.page_index());
        print!("Page {} [{}]", number, page.layout());
        if let Some(title) = page.title {
            print!(" \"{}\"", title);
        }
        println!();
        for (i, photo) in page.photos.iter().enumerate() {
            let position = page.slice.start_index + i + 1;
            let rotation = project.rotation(&photo.id);
            print!("  {:>3}. {}", position, photo.name);
            if photo.is_empty {
                print!(" (empty)");
            }
            if rotation != 0 {
                print!(" rotated {}°", rotation);
            }
            if !photo.annotations.is_empty() {
                print!(" {} annotation(s)", photo.annotations.len());
            }
            println!();
        }
        if page.empty_slots() > 0 {
            println!("       {} free slot(s)", page.empty_slots());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    CliLogger::new(cli.verbose).init()?;

    let backend = ImageRaster::new();

    let mut project = if matches!(cli.command, Commands::New { .. }) {
        Project::new()
    } else {
        Project::load(&cli.project)
            .await
            .with_context(|| format!("Failed to open {}", cli.project.display()))?
    };

    match cli.command {
        Commands::New { layout, force } => {
            if cli.project.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    cli.project.display()
                );
            }
            project.set_global_layout(layout.parse::<Layout>()?);
            println!("Created {}", cli.project.display());
        }

        Commands::Add { images, at } => {
            let mut photos = Vec::with_capacity(images.len());
            for path in &images {
                photos.push(load_photo(&backend, path).await?);
            }
            let count = photos.len();
            match at {
                Some(position) => project.insert_photos_at(position.saturating_sub(1), photos),
                None => project.add_photos(photos),
            }
            println!("Added {} photo(s)", count);
        }

        Commands::Pages {
            section,
            per_section,
        } => {
            if let Some(per_section) = per_section {
                *project.sections_mut() = Sections::new(parse_number(&per_section)?);
            }
            if let Some(section) = &section {
                let total = project.total_pages();
                let number = parse_number(section)?;
                if !project.sections_mut().go_to(number, total) {
                    bail!(
                        "No section {} (project has {})",
                        number,
                        project.total_sections()
                    );
                }
            }
            print_pages(&project, section.is_some());
            return Ok(());
        }

        Commands::Sort { by } => {
            project.sort_photos(by.into());
            println!("Sorted {} photo(s)", project.photos().len());
        }

        Commands::Delete { photos } => {
            let ids = photo_ids(&project, &photos)?;
            let removed = project.delete_photos(&ids);
            println!("Deleted {} photo(s)", removed);
        }

        Commands::Duplicate { photos } => {
            let ids = photo_ids(&project, &photos)?;
            let copies = project.duplicate_photos(&ids);
            println!("Duplicated {} photo(s)", copies.len());
        }

        Commands::InsertPage { position } => {
            let index = project.insert_page(InsertPosition::parse(&position)?)?;
            println!("Inserted page {}", index + 1);
        }

        Commands::DuplicatePage { page } => {
            let index = parse_page_number(&page, project.total_pages())?;
            project.duplicate_page(index)?;
            println!("Duplicated page {}", index + 1);
        }

        Commands::ClearPage { page } => {
            let index = parse_page_number(&page, project.total_pages())?;
            project.clear_page(index)?;
            println!("Cleared page {}", index + 1);
        }

        Commands::SetLayout { layout, page } => {
            let layout: Layout = layout.parse()?;
            match page {
                Some(page) => {
                    let index = parse_page_number(&page, project.total_pages())?;
                    project.set_page_layout(index, Some(layout));
                }
                None => project.set_global_layout(layout),
            }
            println!("Layout set to {}", layout);
        }

        Commands::ResetLayout { page } => {
            let index = parse_page_number(&page, project.total_pages())?;
            project.set_page_layout(index, None);
        }

        Commands::SetTitle { title, page, all } => match page {
            Some(page) => {
                let index = parse_page_number(&page, project.total_pages())?;
                project.set_title(index, &title);
            }
            None if all => {
                project.set_global_title(title);
                project.apply_global_title();
            }
            None => project.set_global_title(title),
        },

        Commands::SetText { photo, text } => {
            let photo = photo_at(&project, photo)?;
            project.set_photo_text(&photo.id, text);
        }

        Commands::Rotate { photos, degrees } => {
            let ids = photo_ids(&project, &photos)?;
            let rotated = project.rotate_photos(&ids, degrees);
            println!("Rotated {} photo(s) by {}°", rotated, degrees);
        }

        Commands::StartPage { number } => {
            let number = u32::try_from(parse_number(&number)?)
                .with_context(|| format!("Start page {} is too large", number))?;
            project.set_start_page_number(number);
            println!("Numbering starts at {}", project.start_page_number());
        }

        Commands::Find { query } => {
            let matches = project.find_text(&query);
            for found in &matches {
                let text = project.field_text(&found.field).unwrap_or_default();
                println!("{}: {}", describe_field(&project, &found.field), text);
            }
            println!("{} occurrence(s)", matches.len());
            return Ok(());
        }

        Commands::Replace {
            query,
            replacement,
            first,
        } => {
            let count = if first {
                match project.find_text(&query).first().cloned() {
                    Some(found) => {
                        project.replace_match(&found, &replacement)?;
                        1
                    }
                    None => 0,
                }
            } else {
                project.replace_all(&query, &replacement)
            };
            println!("Replaced {} occurrence(s)", count);
        }

        Commands::Crop {
            photo,
            x,
            y,
            width,
            height,
        } => {
            let mut photo = photo_at(&project, photo)?;
            let image = match photo.original_size() {
                Some(size) => size,
                None => backend.decode(&photo.src).await?,
            };

            // Select in a 1:1 view so the rectangle is in image pixels
            let mut engine = CropEngine::new();
            engine.activate(Size::new(image.width, image.height));
            engine.set_selection(Rect::new(x, y, width, height));
            let outcome = engine.apply(&mut photo, &backend).await?;
            project.update_photo(photo)?;
            println!(
                "Cropped to {}x{} ({} annotation(s) kept, {} dropped)",
                outcome.size.width, outcome.size.height, outcome.kept, outcome.dropped
            );
        }

        Commands::Export {
            output,
            options,
            paper,
            orientation,
            no_page_numbers,
        } => {
            let mut options = match options {
                Some(path) => ExportOptions::load(path).await?,
                None => ExportOptions::default(),
            };
            if let Some(paper) = paper {
                options.paper_size = paper.into();
            }
            if let Some(orientation) = orientation {
                options.orientation = orientation.into();
            }
            if no_page_numbers {
                options.page_numbers = false;
            }

            let doc = photo_layout::export_pdf(&project, &backend, &options).await?;
            photo_layout::save_pdf(doc, &output).await?;
            println!("Exported → {}", output.display());
            return Ok(());
        }
    }

    project.save(&cli.project).await?;
    Ok(())
}
