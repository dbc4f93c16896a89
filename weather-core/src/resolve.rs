//! Turning a user-typed city name into a confirmed API payload.
//!
//! The API answers with a payload even when it does not know the city. On
//! `404` the typed name is matched against the [`CityCatalog`]: a single close
//! match is adopted silently, several are offered to the user, none means the
//! lookup fails. A `400` fails straight away.

use std::num::IntErrorKind;

use crate::{
    catalog::{CityCatalog, title_case},
    error::{ChoiceError, WeatherError},
    model::{ApiStatus, RawApiPayload, ResolvedQuery},
    provider::WeatherProvider,
};

const CHOICE_PROMPT: &str = "Which city do you mean?";

/// Terminal side of the resolution: printing and reading lines.
pub trait UserInteraction {
    fn notify(&mut self, message: &str);

    fn read_line(&mut self, prompt: &str) -> Result<String, WeatherError>;
}

/// What to do with a rejected disambiguation answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputPolicy {
    /// Explain the problem and ask again.
    #[default]
    Reprompt,
    /// Return the rejection as [`WeatherError::InvalidChoice`].
    FailFast,
}

/// Interpretation of one answer to the candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    Chosen(String),
    Declined,
    Invalid(ChoiceError),
}

/// Map a typed answer onto `candidates` plus the trailing "none of these" option.
pub fn interpret_choice(input: &str, candidates: &[String]) -> Choice {
    let input = input.trim();
    let decline = candidates.len() + 1;
    let out_of_range = || Choice::Invalid(ChoiceError::OutOfRange { choice: input.to_string(), max: decline });

    let choice = match input.parse::<i64>() {
        Ok(choice) => choice,
        // Too many digits is still a number, just not one on the list.
        Err(err) if matches!(err.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            return out_of_range();
        }
        Err(_) => return Choice::Invalid(ChoiceError::NotANumber(input.to_string())),
    };

    match usize::try_from(choice) {
        Ok(n) if n == decline => Choice::Declined,
        Ok(n) if (1..decline).contains(&n) => Choice::Chosen(candidates[n - 1].clone()),
        _ => out_of_range(),
    }
}

/// List the candidates and ask until the user picks one or declines.
///
/// Returns `Ok(None)` when the user declines.
pub fn disambiguate(
    candidates: &[String],
    ui: &mut dyn UserInteraction,
    policy: InputPolicy,
) -> Result<Option<String>, WeatherError> {
    for (index, city) in candidates.iter().enumerate() {
        ui.notify(&format!("{}. {city}", index + 1));
    }
    ui.notify(&format!("{}. None of the above", candidates.len() + 1));

    loop {
        let answer = ui.read_line(CHOICE_PROMPT)?;
        match interpret_choice(&answer, candidates) {
            Choice::Chosen(city) => return Ok(Some(city)),
            Choice::Declined => return Ok(None),
            Choice::Invalid(err) => {
                tracing::debug!(%err, "rejected disambiguation input");
                match policy {
                    InputPolicy::FailFast => return Err(err.into()),
                    InputPolicy::Reprompt => {
                        ui.notify(&WeatherError::from(err).user_message());
                    }
                }
            }
        }
    }
}

pub struct Resolver<'a> {
    provider: &'a dyn WeatherProvider,
    catalog: &'a CityCatalog,
    policy: InputPolicy,
}

impl<'a> Resolver<'a> {
    pub fn new(provider: &'a dyn WeatherProvider, catalog: &'a CityCatalog) -> Self {
        Self { provider, catalog, policy: InputPolicy::default() }
    }

    pub fn with_policy(mut self, policy: InputPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Resolve `city` to a payload, recovering from misspellings where possible.
    ///
    /// With `suppress_errors` set, API error messages are not shown; callers
    /// comparing two cities report the failure themselves.
    pub async fn resolve(
        &self,
        city: &str,
        suppress_errors: bool,
        ui: &mut dyn UserInteraction,
    ) -> Result<ResolvedQuery, WeatherError> {
        let payload = self.provider.current_weather(city).await?;
        let status = ApiStatus::of(&payload);
        tracing::debug!(city, ?status, "initial lookup");

        match status {
            ApiStatus::Success if city.trim().is_empty() => {
                tracing::warn!("API accepted a blank city name");
                Ok(ResolvedQuery::unresolved(city))
            }
            ApiStatus::Success => Ok(ResolvedQuery::resolved(payload, city)),
            ApiStatus::BadRequest => {
                report_api_error(&payload, suppress_errors, ui);
                Ok(ResolvedQuery::unresolved(city))
            }
            ApiStatus::NotFound => self.recover(city, &payload, suppress_errors, ui).await,
        }
    }

    async fn recover(
        &self,
        city: &str,
        not_found: &RawApiPayload,
        suppress_errors: bool,
        ui: &mut dyn UserInteraction,
    ) -> Result<ResolvedQuery, WeatherError> {
        let candidates = self.catalog.fuzzy_match(&title_case(city.trim()));
        tracing::debug!(city, ?candidates, "fuzzy candidates");

        let chosen = match candidates.as_slice() {
            [] => {
                report_api_error(not_found, suppress_errors, ui);
                return Ok(ResolvedQuery::unresolved(city));
            }
            [only] => only.clone(),
            _ => match disambiguate(&candidates, ui, self.policy)? {
                Some(city) => city,
                None => return Ok(ResolvedQuery::unresolved(city)),
            },
        };

        let payload = self.provider.current_weather(&chosen).await?;
        if ApiStatus::of(&payload) != ApiStatus::Success {
            tracing::warn!(city = %chosen, "catalog city was rejected by the API");
        }
        Ok(ResolvedQuery::resolved(payload, chosen))
    }
}

fn report_api_error(payload: &RawApiPayload, suppress: bool, ui: &mut dyn UserInteraction) {
    if suppress {
        return;
    }
    let message = payload
        .get("message")
        .and_then(|m| m.as_str())
        .map(capitalize)
        .unwrap_or_else(|| "City not found".to_string());
    ui.notify(&message);
}

/// Upper-case the first character and lower-case the rest.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
