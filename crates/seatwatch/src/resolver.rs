//! Interactive narrowing search over the catalog.
//!
//! A resolution run walks four stages, each committing one coordinate of
//! the final choice: term, subject, course number, then section. Every
//! prompt accepts the `quit` sentinel, which abandons the whole run.
//! Invalid input never escapes a stage; it prints a diagnostic and asks
//! again. Catalog failures are the one thing that ends a run early.

use crate::catalog::{CatalogError, Course, CourseCatalog, Section};
use crate::console::Console;
use crate::term::TermCode;
use thiserror::Error;
use tracing::{debug, info};

/// The abort sentinel, honored at every prompt.
const QUIT: &str = "quit";

/// Outcome of feeding one line of input to a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<T> {
    /// Input committed; carry the value forward.
    Advance(T),
    /// Input rejected; print the diagnostic and prompt the same stage again.
    Retry(String),
    /// The user asked to stop.
    Abort,
}

/// Errors that end a resolution run. User mistakes never appear here; they
/// loop inside their stage.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("console failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Terminal outcome of a resolution run.
#[derive(Debug)]
pub enum Resolution {
    Resolved(ResolvedSection),
    Aborted,
}

/// The fully narrowed choice: one section of one course offering in one term.
#[derive(Debug)]
pub struct ResolvedSection {
    pub term: TermCode,
    pub subject: String,
    pub course: Course,
    pub section: Section,
}

impl ResolvedSection {
    /// One-line summary, used for the closing console message and the
    /// notification body.
    pub fn summary(&self) -> String {
        format!(
            "{} {} ({}) CRN {} in {}: {} spot(s) remaining",
            self.subject,
            self.course.number,
            self.course.title,
            self.section.crn,
            self.term.label(),
            self.section.remaining_space,
        )
    }
}

/// True if the line is the universal abort sentinel.
pub fn is_quit(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case(QUIT)
}

/// Term stage transition: sentinel first, then term-code validation.
pub fn term_step(input: &str) -> Step<TermCode> {
    if is_quit(input) {
        return Step::Abort;
    }
    match TermCode::parse(input) {
        Ok(term) => Step::Advance(term),
        Err(_) => Step::Retry(
            "Invalid term. Use a season prefix and a two-digit year, like F21, Sp20, or Sm22."
                .to_string(),
        ),
    }
}

/// Subject stage transition: sentinel and normalization. Whether the
/// abbreviation exists is the catalog's call, made by the stage loop.
pub fn subject_step(input: &str) -> Step<String> {
    if is_quit(input) {
        return Step::Abort;
    }
    let normalized = input.trim().to_ascii_uppercase();
    if normalized.is_empty() {
        return Step::Retry(
            "Error! Invalid subject. Make sure you typed the abbreviation, like ECE or CS."
                .to_string(),
        );
    }
    Step::Advance(normalized)
}

/// Course stage transition: the number must match one of the offered
/// courses exactly.
pub fn course_step(input: &str, offered_numbers: &[&str]) -> Step<String> {
    if is_quit(input) {
        return Step::Abort;
    }
    let number = input.trim();
    if offered_numbers.contains(&number) {
        Step::Advance(number.to_string())
    } else {
        Step::Retry(
            "Error! Course number is not in the given list. Type it exactly as it appears, or 'quit' to quit."
                .to_string(),
        )
    }
}

/// Numbered-menu transition: an integer choice strictly within
/// `1..=count`. Shared by the section picker, the cross-listing picker,
/// and the yes/no menus in the session flow.
pub fn index_step(input: &str, count: usize) -> Step<usize> {
    if is_quit(input) {
        return Step::Abort;
    }
    match input.trim().parse::<usize>() {
        Ok(choice) if (1..=count).contains(&choice) => Step::Advance(choice),
        _ => Step::Retry(format!(
            "Error! Enter a number between 1 and {count}, or 'quit' to quit."
        )),
    }
}

/// Drives the four-stage search over a catalog and a console.
pub struct SectionResolver<'a, C, IO> {
    catalog: &'a C,
    console: &'a mut IO,
}

impl<'a, C: CourseCatalog, IO: Console> SectionResolver<'a, C, IO> {
    pub fn new(catalog: &'a C, console: &'a mut IO) -> Self {
        Self { catalog, console }
    }

    /// Runs the search to one of its two terminals. `Ok(Aborted)` is the
    /// quit path; an `Err` means the catalog or console gave out.
    pub async fn run(&mut self) -> Result<Resolution, ResolveError> {
        let Some(term) = self.select_term()? else {
            return Ok(Resolution::Aborted);
        };
        let Some(subject) = self.select_subject().await? else {
            return Ok(Resolution::Aborted);
        };
        let Some(course) = self.select_course(&term, &subject).await? else {
            return Ok(Resolution::Aborted);
        };
        let Some(section) = self.select_section(&course)? else {
            return Ok(Resolution::Aborted);
        };
        info!(
            term = %term.code(),
            subject = %subject,
            course = %course.number,
            crn = %section.crn,
            "section resolved"
        );
        Ok(Resolution::Resolved(ResolvedSection {
            term,
            subject,
            course,
            section,
        }))
    }

    fn select_term(&mut self) -> Result<Option<TermCode>, ResolveError> {
        self.console.write_line("What term are you looking at?");
        self.console.write_line(
            "Type F for Fall, Sp for Spring, or Sm for Summer, followed by the last two digits of the year.",
        );
        self.console
            .write_line("For example: F21 for Fall 2021, Sp20 for Spring 2020, Sm22 for Summer 2022.");
        self.console.write_line("Or type 'quit' to quit.");
        loop {
            let line = self.console.read_line()?;
            match term_step(&line) {
                Step::Advance(term) => {
                    info!(term = %term.code(), "term selected");
                    return Ok(Some(term));
                }
                Step::Retry(diagnostic) => self.console.write_line(&diagnostic),
                Step::Abort => return Ok(None),
            }
        }
    }

    async fn select_subject(&mut self) -> Result<Option<String>, ResolveError> {
        self.console.write_line(
            "What subject is the course in? Type the abbreviation (for example ECE, CS, or MA), or 'quit' to quit.",
        );
        loop {
            let line = self.console.read_line()?;
            let candidate = match subject_step(&line) {
                Step::Advance(candidate) => candidate,
                Step::Retry(diagnostic) => {
                    self.console.write_line(&diagnostic);
                    continue;
                }
                Step::Abort => return Ok(None),
            };
            if self.catalog.find_subject(&candidate).await? {
                info!(subject = %candidate, "subject selected");
                return Ok(Some(candidate));
            }
            self.console.write_line(
                "Error! Invalid subject. Make sure you typed the abbreviation, like ECE or CS.",
            );
        }
    }

    async fn select_course(
        &mut self,
        term: &TermCode,
        subject: &str,
    ) -> Result<Option<Course>, ResolveError> {
        let courses = self.catalog.list_courses(term, subject).await?;
        let offered: Vec<&Course> = courses.iter().filter(|c| c.is_offered()).collect();
        debug!(
            subject = %subject,
            total = courses.len(),
            offered = offered.len(),
            "course listing fetched"
        );
        if offered.is_empty() {
            self.console.write_line(&format!(
                "No {subject} courses have sections in {}. Nothing to choose from.",
                term.label()
            ));
            return Ok(None);
        }

        self.console
            .write_line(&format!("\nCourses in {}:", term.label()));
        for course in &offered {
            self.console
                .write_line(&format!("{subject} {}: {}", course.number, course.title));
        }
        self.console
            .write_line("\nChoose a course number from the list above, or type 'quit' to quit.");

        let numbers: Vec<&str> = offered.iter().map(|c| c.number.as_str()).collect();
        loop {
            self.console.write_line("Enter course number here:");
            let line = self.console.read_line()?;
            match course_step(&line, &numbers) {
                Step::Advance(number) => {
                    info!(subject = %subject, number = %number, "course selected");
                    return self.select_listing(term, subject, &number).await;
                }
                Step::Retry(diagnostic) => self.console.write_line(&diagnostic),
                Step::Abort => return Ok(None),
            }
        }
    }

    /// Narrows a committed course number to a single course record. A
    /// number shared by several records is cross-listed and needs one more
    /// pick before sections can be shown.
    async fn select_listing(
        &mut self,
        term: &TermCode,
        subject: &str,
        number: &str,
    ) -> Result<Option<Course>, ResolveError> {
        let records = self
            .catalog
            .load_course_alternatives(term, subject, number)
            .await?;
        let mut offered: Vec<Course> = records.into_iter().filter(|c| c.is_offered()).collect();
        if offered.is_empty() {
            return Err(CatalogError::malformed(format!(
                "course {subject} {number} was listed for {} but came back without sections",
                term.code()
            ))
            .into());
        }
        if offered.len() == 1 {
            return Ok(offered.pop());
        }

        debug!(number = %number, listings = offered.len(), "course number is cross-listed");
        self.console.write_line(&format!(
            "\nCourse {subject} {number} has multiple listings. Choose one of the following."
        ));
        for (position, course) in offered.iter().enumerate() {
            self.console.write_line(&format!(
                "{}. {} ({})",
                position + 1,
                course.title,
                credit_label(course.credit_hours)
            ));
        }
        loop {
            self.console.write_line("Enter a listing number here:");
            let line = self.console.read_line()?;
            match index_step(&line, offered.len()) {
                Step::Advance(choice) => {
                    if let Some(course) = offered.get(choice - 1) {
                        return Ok(Some(course.clone()));
                    }
                }
                Step::Retry(diagnostic) => self.console.write_line(&diagnostic),
                Step::Abort => return Ok(None),
            }
        }
    }

    fn select_section(&mut self, course: &Course) -> Result<Option<Section>, ResolveError> {
        let sections: Vec<&Section> = course.sections().collect();
        if sections.is_empty() {
            return Err(CatalogError::malformed(format!(
                "course {} has no sections despite being offered",
                course.number
            ))
            .into());
        }

        self.console
            .write_line("\nPlease choose a section from the following.");
        for (position, section) in sections.iter().enumerate() {
            self.render_section(position + 1, section);
        }
        loop {
            self.console.write_line("\nEnter section number here:");
            let line = self.console.read_line()?;
            match index_step(&line, sections.len()) {
                Step::Advance(choice) => {
                    if let Some(section) = sections.get(choice - 1) {
                        info!(crn = %section.crn, "section selected");
                        return Ok(Some((*section).clone()));
                    }
                }
                Step::Retry(diagnostic) => self.console.write_line(&diagnostic),
                Step::Abort => return Ok(None),
            }
        }
    }

    /// Prints one section card. Missing meeting data degrades to
    /// placeholders; a section with no renderable schedule is still listed
    /// and still selectable.
    fn render_section(&mut self, position: usize, section: &Section) {
        self.console.write_line(&format!("\nSection {position}"));
        self.console
            .write_line(&format!("CRN: {}", section.crn));
        let meeting = section.first_meeting();
        let kind = meeting
            .and_then(|m| m.kind.as_deref())
            .unwrap_or("Unknown");
        let days = meeting
            .and_then(|m| m.days_of_week.as_deref())
            .unwrap_or("Unlisted");
        self.console.write_line(&format!("Type: {kind}"));
        self.console.write_line(&format!("Meeting days: {days}"));
        match meeting.and_then(|m| m.display_window()) {
            Some(window) => self
                .console
                .write_line(&format!("Timeslot: {window}")),
            None => self.console.write_line("Timeslot: time unknown"),
        }
        self.console
            .write_line(&format!("Remaining spots: {}", section.remaining_space));
    }
}

fn credit_label(credit_hours: Option<f64>) -> String {
    match credit_hours {
        Some(hours) if hours.fract() == 0.0 => format!("{} credit hours", hours as i64),
        Some(hours) => format!("{hours} credit hours"),
        None => "credit hours unlisted".to_string(),
    }
}
