use std::fmt::Display;
use std::io::{BufRead, Write};

use anyhow::Result;
use charter_core::{CatalogStage, CharterKey, Dispatch, ProductLine, Step};
use charter_desk::{BookingSession, DeskError, LinkOpener};

enum Answer {
    Text(String),
    Back,
    Quit,
}

enum Flow {
    Stay,
    Advance,
    Back,
    Quit,
    Sent(Dispatch),
}

/// Unwraps a text answer or leaves the current step on `back` / `quit`.
macro_rules! ask {
    ($prompt:expr, $label:expr) => {
        ask!($prompt, $label, "")
    };
    ($prompt:expr, $label:expr, $current:expr) => {
        match $prompt.ask($label, $current)? {
            Answer::Text(text) => text,
            Answer::Back => return Ok(Flow::Back),
            Answer::Quit => return Ok(Flow::Quit),
        }
    };
}

struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// An empty reply keeps `current`. End of input counts as `quit`.
    fn ask(&mut self, label: &str, current: &str) -> Result<Answer> {
        if current.is_empty() {
            write!(self.output, "{label}: ")?;
        } else {
            write!(self.output, "{label} [{current}]: ")?;
        }
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(Answer::Quit);
        }

        let value = line.trim();
        Ok(match value.to_lowercase().as_str() {
            "back" => Answer::Back,
            "quit" | "exit" => Answer::Quit,
            "" => Answer::Text(current.to_string()),
            _ => Answer::Text(value.to_string()),
        })
    }

    fn say(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    fn list<'a>(&mut self, items: impl IntoIterator<Item = &'a str>) -> Result<()> {
        for (index, item) in items.into_iter().enumerate() {
            writeln!(self.output, "  {:>2}. {}", index + 1, item)?;
        }
        Ok(())
    }
}

/// Walks a session through the wizard on a terminal. `None` when the guest quits.
pub fn run_booking<R: BufRead, W: Write>(
    session: &mut BookingSession,
    opener: &dyn LinkOpener,
    input: R,
    output: W,
) -> Result<Option<Dispatch>> {
    let mut prompt = Prompter { input, output };
    prompt.say(format_args!(
        "Booking session {}. Type 'back' to go back or 'quit' to leave.",
        session.id()
    ))?;

    loop {
        let step = session.step();
        prompt.say(format_args!("\n== Step {step} =="))?;

        let flow = match step {
            Step::GuestDetails => guest_details(session, &mut prompt)?,
            Step::CatalogConfig {
                stage: CatalogStage::Browsing,
            } => choose_vessel(session, &mut prompt)?,
            Step::CatalogConfig {
                stage: CatalogStage::Configuring(ProductLine::Yacht),
            } => configure_yacht(session, &mut prompt)?,
            Step::CatalogConfig {
                stage: CatalogStage::Configuring(ProductLine::Helicopter),
            } => configure_helicopter(session, &mut prompt)?,
            Step::PersonalRequest => personal_request(session, &mut prompt)?,
            Step::Summary { .. } => review(session, opener, &mut prompt)?,
        };

        match flow {
            Flow::Stay => {}
            Flow::Advance => {
                if let Err(errors) = session.next() {
                    for error in errors.iter() {
                        prompt.say(format_args!("  ! {error}"))?;
                    }
                }
            }
            Flow::Back => {
                session.back();
            }
            Flow::Quit => return Ok(None),
            Flow::Sent(dispatch) => return Ok(Some(dispatch)),
        }
    }
}

fn guest_details<R: BufRead, W: Write>(
    session: &mut BookingSession,
    prompt: &mut Prompter<R, W>,
) -> Result<Flow> {
    let draft = session.wizard().draft().clone();
    let name = ask!(prompt, "Full name", &draft.name);
    let phone = ask!(prompt, "Phone number", &draft.phone);
    let date = ask!(prompt, "Charter date (YYYY-MM-DD)", &draft.date);
    let passengers = ask!(prompt, "Passengers", &draft.passengers);

    let wizard = session.wizard_mut();
    wizard.set_name(name);
    wizard.set_phone(phone);
    wizard.set_date(date);
    wizard.set_passengers(passengers);
    Ok(Flow::Advance)
}

fn choose_vessel<R: BufRead, W: Write>(
    session: &mut BookingSession,
    prompt: &mut Prompter<R, W>,
) -> Result<Flow> {
    let vessels = session
        .wizard()
        .vessels()
        .iter()
        .map(|vessel| {
            (
                vessel.id.clone(),
                format!("{} ({})", vessel.name, vessel.kind.as_code()),
            )
        })
        .collect::<Vec<_>>();
    if vessels.is_empty() {
        prompt.say("The catalog has no vessels to book.")?;
        return Ok(Flow::Quit);
    }

    prompt.list(vessels.iter().map(|(_, label)| label.as_str()))?;
    let choice = ask!(prompt, "Vessel number or id");
    let id = pick(&choice, &vessels);

    if let Err(error) = session.select_vessel(&id) {
        prompt.say(format_args!("  ! {error}"))?;
    }
    Ok(Flow::Stay)
}

fn configure_yacht<R: BufRead, W: Write>(
    session: &mut BookingSession,
    prompt: &mut Prompter<R, W>,
) -> Result<Flow> {
    let config = session.wizard().config().clone();
    if let Some(vessel) = session.wizard().selected_vessel() {
        let profile = config.profile_for(&vessel.id);
        prompt.say(format_args!(
            "{}: {}. {}",
            vessel.name, profile.capacity, profile.description
        ))?;
    }

    let destinations = config
        .destinations
        .iter()
        .map(|destination| (destination.value.clone(), destination.label.clone()))
        .collect::<Vec<_>>();
    prompt.list(destinations.iter().map(|(_, label)| label.as_str()))?;
    let current = session.wizard().draft().destination.clone();
    let choice = ask!(prompt, "Destination", &current);
    let destination = pick(&choice, &destinations);
    if let Err(error) = session.wizard_mut().select_destination(destination) {
        prompt.say(format_args!("  ! {error}"))?;
    }

    let tiers = config
        .charters
        .tiers()
        .into_iter()
        .map(|tier| (tier.to_string(), tier.to_string()))
        .collect::<Vec<_>>();
    prompt.list(tiers.iter().map(|(_, label)| label.as_str()))?;
    let choice = ask!(prompt, "Charter tier");
    let tier = pick(&choice, &tiers);
    if let Err(error) = session.select_tier(&tier) {
        prompt.say(format_args!("  ! {error}"))?;
        return Ok(Flow::Stay);
    }

    let packages = session
        .wizard()
        .tier_prices()
        .into_iter()
        .flat_map(|prices| {
            prices.options.iter().map(move |option| {
                (
                    (prices.location.to_string(), option.duration.clone()),
                    format!("{} - {} {}", prices.location, option.duration, option.price),
                )
            })
        })
        .collect::<Vec<_>>();
    prompt.list(packages.iter().map(|(_, label)| label.as_str()))?;
    let choice = ask!(prompt, "Charter package number");
    match by_number(&choice, &packages).cloned() {
        Some((location, duration)) => {
            if let Err(error) = session.select_charter(&location, &duration) {
                prompt.say(format_args!("  ! {error}"))?;
            }
        }
        None => prompt.say("  ! pick a package by its number")?,
    }

    prompt.list(config.food_options.iter().map(String::as_str))?;
    let food = ask!(prompt, "Food (comma-separated numbers)");
    prompt.list(config.drink_options.iter().map(String::as_str))?;
    let drinks = ask!(prompt, "Drinks (comma-separated numbers)");
    let dj = ask!(prompt, "DJ service? (y/n)", "n");

    let wizard = session.wizard_mut();
    for (index, option) in config.food_options.iter().enumerate() {
        wizard.toggle_food(option, picked(&food, index));
    }
    for (index, option) in config.drink_options.iter().enumerate() {
        wizard.toggle_drink(option, picked(&drinks, index));
    }
    wizard.set_dj(is_yes(&dj));
    Ok(Flow::Advance)
}

fn configure_helicopter<R: BufRead, W: Write>(
    session: &mut BookingSession,
    prompt: &mut Prompter<R, W>,
) -> Result<Flow> {
    let services = session
        .wizard()
        .config()
        .helicopter
        .listings()
        .into_iter()
        .map(|listing| (listing.value, listing.label))
        .collect::<Vec<_>>();
    prompt.list(services.iter().map(|(_, label)| label.as_str()))?;

    let choice = ask!(prompt, "Helicopter service number");
    let key = by_number(&choice, &services).and_then(|value| CharterKey::parse(value));
    match key {
        Some(CharterKey::Helicopter { location, service }) => {
            if let Err(error) = session.select_helicopter_service(&location, &service) {
                prompt.say(format_args!("  ! {error}"))?;
            }
        }
        _ => prompt.say("  ! pick a service by its number")?,
    }
    Ok(Flow::Advance)
}

fn personal_request<R: BufRead, W: Write>(
    session: &mut BookingSession,
    prompt: &mut Prompter<R, W>,
) -> Result<Flow> {
    let activities = session.wizard().config().activity_options.clone();
    let draft = session.wizard().draft().clone();

    let allergies = ask!(prompt, "Allergies (optional)", &draft.allergies);
    let occasion = ask!(prompt, "Special occasion (optional)", &draft.special_occasion);
    prompt.list(activities.iter().map(String::as_str))?;
    let chosen = ask!(prompt, "Activities (comma-separated numbers, optional)");
    let other = ask!(prompt, "Other activity preferences (optional)", &draft.other_activity);

    let wizard = session.wizard_mut();
    wizard.set_allergies(allergies);
    wizard.set_special_occasion(occasion);
    for (index, activity) in activities.iter().enumerate() {
        wizard.toggle_activity(activity, picked(&chosen, index));
    }
    wizard.set_other_activity(other);
    Ok(Flow::Advance)
}

fn review<R: BufRead, W: Write>(
    session: &mut BookingSession,
    opener: &dyn LinkOpener,
    prompt: &mut Prompter<R, W>,
) -> Result<Flow> {
    prompt.say(session.summary())?;
    let choice = ask!(prompt, "Send via WhatsApp? (send/back/quit)", "send");
    if !matches!(choice.to_lowercase().as_str(), "send" | "y" | "yes") {
        return Ok(Flow::Stay);
    }

    match session.submit(opener) {
        Ok(dispatch) => Ok(Flow::Sent(dispatch)),
        Err(DeskError::Submit(error)) => {
            prompt.say(format_args!("  ! {error}"))?;
            Ok(Flow::Stay)
        }
        Err(error) => Err(error.into()),
    }
}

/// A 1-based list number.
fn by_number<'a, T>(choice: &str, items: &'a [(T, String)]) -> Option<&'a T> {
    let number = choice.trim().parse::<usize>().ok()?;
    number
        .checked_sub(1)
        .and_then(|index| items.get(index))
        .map(|(value, _)| value)
}

/// A list number, otherwise the reply itself.
fn pick(choice: &str, items: &[(String, String)]) -> String {
    by_number(choice, items)
        .cloned()
        .unwrap_or_else(|| choice.trim().to_string())
}

fn picked(numbers: &str, index: usize) -> bool {
    numbers
        .split(',')
        .filter_map(|part| part.trim().parse::<usize>().ok())
        .any(|number| number == index + 1)
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
