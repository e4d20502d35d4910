//! Workout parser driver with global logging integration
//!
//! Owns the cursor for one parse. The grammar builders do the work; the
//! driver logs progress and failures in one place.

use crate::config::runtime::SyntaxPreferences;
use crate::grammar::ast::nodes::{Section, Workout};
use crate::grammar::builders::parse_workout;
use crate::logging::codes;
use crate::syntax::error::{SyntaxError, SyntaxResult};
use crate::tokens::{Cursor, Token};
use crate::{log_debug, log_error, log_info, log_success};

pub struct WorkoutParser {
    cursor: Cursor,
    preferences: SyntaxPreferences,
}

impl WorkoutParser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_preferences(tokens, SyntaxPreferences::default())
    }

    pub fn with_preferences(tokens: Vec<Token>, preferences: SyntaxPreferences) -> Self {
        log_debug!("Creating workout parser", "tokens" => tokens.len());

        Self {
            cursor: Cursor::new(tokens),
            preferences,
        }
    }

    /// Parse every section; consumes the parser
    pub fn parse(mut self) -> SyntaxResult<Workout> {
        log_info!("Starting workout parsing",
            "tokens" => self.cursor.tokens().len()
        );

        match parse_workout(&mut self.cursor) {
            Ok(workout) => {
                if self.preferences.log_section_details {
                    for (index, section) in workout.sections.iter().enumerate() {
                        log_section(index, section);
                    }
                }

                log_success!(codes::success::PARSE_COMPLETE,
                    "Workout parsing completed successfully",
                    "sections" => workout.len(),
                    "final_position" => self.cursor.position()
                );
                Ok(workout)
            }
            Err(error) => {
                self.log_failure(&error);
                Err(error)
            }
        }
    }

    fn log_failure(&self, error: &SyntaxError) {
        match error {
            SyntaxError::Parse(parse) => {
                log_error!(error.error_code(), "Workout parsing failed",
                    span = parse.span(),
                    "error" => error,
                    "position" => self.cursor.position()
                );
            }
            SyntaxError::Semantic(_) => {
                log_error!(error.error_code(), "Workout validation failed",
                    "error" => error,
                    "offset" => error.offset()
                );
            }
        }
    }
}

fn log_section(index: usize, section: &Section) {
    let components: Vec<&str> = section.components().iter().map(|c| c.as_str()).collect();
    log_debug!("Parsed section",
        "index" => index,
        "components" => components.join(",")
    );
}

pub fn create_parser(tokens: Vec<Token>) -> WorkoutParser {
    WorkoutParser::new(tokens)
}
