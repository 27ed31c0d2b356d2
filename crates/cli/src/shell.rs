//! Interactive numbered menu over a movie store.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use tracing::{debug, warn};

use cinelog_core::{
    compute_stats, generate_site, metadata::MetadataError, parse_rating, parse_year,
    pick_random_movie, search, sorted_by_rating, LookupAdded, Movie, MovieStore, SearchOutcome,
    SiteConfig, SiteError, StoreError,
};

/// Menu entries in display order; the index is the number the user types.
const MENU: [(Command, &str); 10] = [
    (Command::Exit, "Exit"),
    (Command::List, "List movies"),
    (Command::Add, "Add movie"),
    (Command::Delete, "Delete movie"),
    (Command::Update, "Update movie"),
    (Command::Stats, "Stats"),
    (Command::Random, "Random movie"),
    (Command::Search, "Search movie"),
    (Command::Sorted, "Movies sorted by rating"),
    (Command::GenerateSite, "Generate website"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Exit,
    List,
    Add,
    Delete,
    Update,
    Stats,
    Random,
    Search,
    Sorted,
    GenerateSite,
}

impl Command {
    fn from_choice(choice: i64) -> Option<Self> {
        usize::try_from(choice)
            .ok()
            .and_then(|i| MENU.get(i))
            .map(|(command, _)| *command)
    }
}

/// Reads commands from `input` and writes results to `output`.
pub struct Shell<R, W> {
    store: Arc<dyn MovieStore>,
    site: SiteConfig,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(store: Arc<dyn MovieStore>, site: SiteConfig, input: R, output: W) -> Self {
        Self {
            store,
            site,
            input,
            output,
        }
    }

    /// Consume the shell and return its output sink.
    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run the menu loop until the user exits or input ends.
    pub async fn run(&mut self) -> io::Result<()> {
        writeln!(
            self.output,
            "Movie catalog: {} ({} backend)",
            self.store.path().display(),
            self.store.name()
        )?;

        loop {
            self.print_menu()?;

            let Some(line) = self.prompt("Enter choice (0-9): ")? else {
                return self.goodbye();
            };

            let command = match line.trim().parse::<i64>() {
                Ok(choice) => match Command::from_choice(choice) {
                    Some(command) => command,
                    None => {
                        writeln!(
                            self.output,
                            "Invalid choice. Please enter a number between 0 and {}.",
                            MENU.len() - 1
                        )?;
                        continue;
                    }
                },
                Err(_) => {
                    writeln!(self.output, "Invalid input.")?;
                    continue;
                }
            };

            debug!("Menu command: {:?}", command);
            writeln!(self.output)?;

            if command == Command::Exit {
                return self.goodbye();
            }

            self.dispatch(command).await?;

            if self.prompt("\nPress Enter to return to menu: ")?.is_none() {
                return self.goodbye();
            }
        }
    }

    async fn dispatch(&mut self, command: Command) -> io::Result<()> {
        match command {
            Command::Exit => Ok(()),
            Command::List => self.list_movies(),
            Command::Add => self.add_movie().await,
            Command::Delete => self.delete_movie(),
            Command::Update => self.update_movie(),
            Command::Stats => self.stats(),
            Command::Random => self.random_movie(),
            Command::Search => self.search_movie(),
            Command::Sorted => self.sorted_movies(),
            Command::GenerateSite => self.generate_site(),
        }
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "\nMenu:")?;
        for (number, (_, label)) in MENU.iter().enumerate() {
            writeln!(self.output, "{}. {}", number, label)?;
        }
        writeln!(self.output)
    }

    fn goodbye(&mut self) -> io::Result<()> {
        writeln!(self.output, "Exiting program. Goodbye!")?;
        self.output.flush()
    }

    /// Print `message` and read one line. `None` means input is exhausted.
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than failing the
    /// session; they then fail whatever parsing the command applies.
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;

        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&line);
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn report_store_error(&mut self, err: &StoreError) -> io::Result<()> {
        match err {
            StoreError::NotFound(title) => {
                writeln!(self.output, "Movie '{}' not found in the list.", title)
            }
            StoreError::InvalidField { .. } => writeln!(self.output, "Invalid input: {}", err),
            StoreError::Lookup(MetadataError::NotFound(_)) => {
                writeln!(self.output, "Movie not found.")
            }
            _ => {
                warn!("Store operation failed: {}", err);
                writeln!(self.output, "Error: {}", err)
            }
        }
    }

    fn list_movies(&mut self) -> io::Result<()> {
        let movies = self.store.list_movies();
        if movies.is_empty() {
            return writeln!(self.output, "No movies in the catalog.");
        }

        writeln!(self.output, "{} movies in total", movies.len())?;
        for (title, movie) in &movies {
            writeln!(
                self.output,
                "{}: {}, {}",
                title,
                display_rating(movie.rating),
                display_year(movie)
            )?;
        }
        Ok(())
    }

    async fn add_movie(&mut self) -> io::Result<()> {
        if self.store.supports_lookup() {
            return self.add_movie_from_lookup().await;
        }

        let Some(title) = self.prompt("Enter new movie name: ")? else {
            return Ok(());
        };
        let title = title.trim().to_string();
        if title.is_empty() {
            return writeln!(self.output, "Title cannot be empty.");
        }

        let Some(year) = self.prompt("Enter release year: ")? else {
            return Ok(());
        };
        let year = match parse_year(&year) {
            Ok(year) => year,
            Err(e) => return self.report_store_error(&e),
        };

        let Some(rating) = self.prompt("Enter rating (0-10): ")? else {
            return Ok(());
        };
        let rating = match parse_rating(&rating) {
            Ok(rating) => rating,
            Err(e) => return self.report_store_error(&e),
        };

        let Some(poster) = self.prompt("Enter poster URL (optional): ")? else {
            return Ok(());
        };

        match self.store.add_movie(&title, year, rating, poster.trim()) {
            Ok(Some(_)) => writeln!(
                self.output,
                "Movie '{}' already existed and was replaced.",
                title
            ),
            Ok(None) => writeln!(self.output, "Movie '{}' successfully added.", title),
            Err(e) => self.report_store_error(&e),
        }
    }

    async fn add_movie_from_lookup(&mut self) -> io::Result<()> {
        let Some(fragment) = self.prompt("Enter new movie name: ")? else {
            return Ok(());
        };
        if fragment.trim().is_empty() {
            return writeln!(self.output, "Title cannot be empty.");
        }

        match self.store.add_from_lookup(&fragment).await {
            Ok(LookupAdded {
                title,
                replaced: Some(_),
                ..
            }) => writeln!(
                self.output,
                "Movie '{}' already existed and was replaced.",
                title
            ),
            Ok(LookupAdded { title, .. }) => {
                writeln!(self.output, "{} is added now to your movie list.", title)
            }
            Err(e) => self.report_store_error(&e),
        }
    }

    fn delete_movie(&mut self) -> io::Result<()> {
        let Some(title) = self.prompt("Enter a movie to delete: ")? else {
            return Ok(());
        };
        let title = title.trim();

        match self.store.delete_movie(title) {
            Ok(_) => writeln!(self.output, "{} got deleted.", title),
            Err(e) => self.report_store_error(&e),
        }
    }

    fn update_movie(&mut self) -> io::Result<()> {
        let Some(title) = self.prompt("Enter movie name: ")? else {
            return Ok(());
        };
        let title = title.trim().to_string();
        if !self.store.list_movies().contains_key(&title) {
            return self.report_store_error(&StoreError::NotFound(title));
        }

        let Some(rating) = self.prompt("Enter new rating: ")? else {
            return Ok(());
        };
        let result = parse_rating(&rating).and_then(|r| self.store.update_movie(&title, r));

        match result {
            Ok(()) => writeln!(self.output, "Movie {} successfully updated", title),
            Err(e) => self.report_store_error(&e),
        }
    }

    fn stats(&mut self) -> io::Result<()> {
        let movies = self.store.list_movies();
        let Some(stats) = compute_stats(&movies) else {
            return writeln!(self.output, "No movies to display statistics.");
        };

        writeln!(self.output, "Average rating: {}", display_rating(stats.mean))?;
        writeln!(self.output, "Median rating: {}", display_rating(stats.median))?;
        writeln!(
            self.output,
            "The best movie(s) ({}): {}",
            display_rating(stats.best_rating),
            stats.best.join(", ")
        )?;
        writeln!(
            self.output,
            "The worst movie(s) ({}): {}",
            display_rating(stats.worst_rating),
            stats.worst.join(", ")
        )
    }

    fn random_movie(&mut self) -> io::Result<()> {
        let movies = self.store.list_movies();
        match pick_random_movie(&movies) {
            Some((title, movie)) => writeln!(
                self.output,
                "Your movie for tonight: {}, it's rated: {}",
                title,
                display_rating(movie.rating)
            ),
            None => writeln!(self.output, "No movies available."),
        }
    }

    fn search_movie(&mut self) -> io::Result<()> {
        let Some(query) = self.prompt("Enter part of movie name: ")? else {
            return Ok(());
        };

        let movies = self.store.list_movies();
        match search(&movies, &query) {
            SearchOutcome::EmptyCatalog => writeln!(self.output, "No movies in the catalog."),
            SearchOutcome::NoMatch => writeln!(self.output, "No movies found with that name."),
            SearchOutcome::Matches(found) => {
                for (title, movie) in found {
                    writeln!(
                        self.output,
                        "{}, Rating: {} Year: {}",
                        title,
                        display_rating(movie.rating),
                        display_year(movie)
                    )?;
                }
                Ok(())
            }
        }
    }

    fn sorted_movies(&mut self) -> io::Result<()> {
        let movies = self.store.list_movies();
        if movies.is_empty() {
            return writeln!(self.output, "No movies in the catalog.");
        }

        for (title, movie) in sorted_by_rating(&movies) {
            writeln!(self.output, "{}: {}", title, display_rating(movie.rating))?;
        }
        Ok(())
    }

    fn generate_site(&mut self) -> io::Result<()> {
        let movies = self.store.list_movies();
        match generate_site(&movies, &self.site) {
            Ok(path) => writeln!(
                self.output,
                "Website was generated successfully: {}",
                path.display()
            ),
            Err(SiteError::TemplateNotFound { path }) => writeln!(
                self.output,
                "Error: Template file not found: {}",
                path.display()
            ),
            Err(e) => {
                warn!("Site generation failed: {:?}", e);
                writeln!(self.output, "An error occurred: {}", e)
            }
        }
    }
}

/// The stored rating as entered. Whole numbers keep one decimal (`8.0`).
fn display_rating(rating: f64) -> String {
    if rating.fract() == 0.0 {
        format!("{:.1}", rating)
    } else {
        rating.to_string()
    }
}

fn display_year(movie: &Movie) -> String {
    movie
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}
