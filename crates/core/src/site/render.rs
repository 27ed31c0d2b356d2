//! HTML rendering of a catalog.

use std::fmt::Write;

use crate::catalog::Catalog;

/// Token replaced by the page title.
pub const TITLE_PLACEHOLDER: &str = "__TEMPLATE_TITLE__";

/// Token replaced by the movie list items.
pub const GRID_PLACEHOLDER: &str = "__TEMPLATE_MOVIE_GRID__";

/// Poster shown for movies without one.
pub const PLACEHOLDER_POSTER: &str = "https://via.placeholder.com/150";

/// Shown instead of an unknown year.
pub const UNKNOWN_YEAR: &str = "N/A";

/// One `<li>` per movie, in catalog order.
pub fn movie_grid(catalog: &Catalog) -> String {
    let mut grid = String::new();

    for (title, movie) in catalog {
        let poster = movie.poster_url().unwrap_or(PLACEHOLDER_POSTER);
        let year = movie
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| UNKNOWN_YEAR.to_string());
        let title = escape_html(title);

        // Writing to a String cannot fail.
        let _ = write!(
            grid,
            r#"
            <li>
                <div class="movie">
                    <img class="movie-poster" src="{poster}" alt="Poster of {title}"/>
                    <div class="movie-title">{title}</div>
                    <div class="movie-year">{year}</div>
                </div>
            </li>
            "#,
            poster = escape_html(poster),
            title = title,
            year = year,
        );
    }

    grid
}

/// Substitute the title and movie grid into `template`.
///
/// Tokens are replaced in a single pass over the template, so a token that
/// appears inside the inserted title or grid is left as text. A template
/// without the grid token renders without movie content.
pub fn render_page(template: &str, page_title: &str, catalog: &Catalog) -> String {
    let title = escape_html(page_title);
    let grid = movie_grid(catalog);
    let substitutions = [
        (TITLE_PLACEHOLDER, title.as_str()),
        (GRID_PLACEHOLDER, grid.as_str()),
    ];

    let mut page = String::with_capacity(template.len() + grid.len());
    let mut rest = template;
    loop {
        let next = substitutions
            .iter()
            .filter_map(|(token, value)| rest.find(token).map(|at| (at, *token, *value)))
            .min_by_key(|(at, _, _)| *at);

        match next {
            Some((at, token, value)) => {
                page.push_str(&rest[..at]);
                page.push_str(value);
                rest = &rest[at + token.len()..];
            }
            None => {
                page.push_str(rest);
                return page;
            }
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
