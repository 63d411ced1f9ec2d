/// Scoring rules: which door votes for which color, and how the final
/// personality is picked from the tally.
///
/// Pure functions and a small value type; the controller owns the tally
/// and calls in here on every door transition.

use std::fmt;

use crate::domain::entity::Hue;

/// Which of the two doors the player walked through.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DoorSide {
    Yes,
    No,
}

/// Levels whose doors contribute to the tally.
pub const SCORED_LEVELS: usize = 8;

/// Vote cast by the "yes" door of levels 1..=8.
const YES_CHOICE: [Option<Hue>; SCORED_LEVELS] = [
    Some(Hue::Blue),
    Some(Hue::Red),
    Some(Hue::Blue),
    Some(Hue::Green),
    Some(Hue::Blue),
    Some(Hue::Red),
    Some(Hue::Blue),
    Some(Hue::Blue),
];

/// Vote cast by the "no" door of levels 1..=8. The last scored level's
/// "no" door abstains.
const NO_CHOICE: [Option<Hue>; SCORED_LEVELS] = [
    Some(Hue::Red),
    Some(Hue::Green),
    Some(Hue::Red),
    Some(Hue::Red),
    Some(Hue::Green),
    Some(Hue::Green),
    Some(Hue::Green),
    None,
];

pub fn yes_choice(level: usize) -> Option<Hue> {
    level.checked_sub(1).and_then(|i| YES_CHOICE.get(i).copied().flatten())
}

pub fn no_choice(level: usize) -> Option<Hue> {
    level.checked_sub(1).and_then(|i| NO_CHOICE.get(i).copied().flatten())
}

/// Vote for a door on a level, if that door scores at all.
pub fn choice_for(level: usize, side: DoorSide) -> Option<Hue> {
    match side {
        DoorSide::Yes => yes_choice(level),
        DoorSide::No => no_choice(level),
    }
}

/// Running count of votes per color for one playthrough.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub red: u32,
    pub green: u32,
    pub blue: u32,
}

impl Tally {
    #[cfg(test)]
    pub fn new(red: u32, green: u32, blue: u32) -> Self {
        Tally { red, green, blue }
    }

    pub fn add(&mut self, hue: Hue) {
        match hue {
            Hue::Red => self.red += 1,
            Hue::Green => self.green += 1,
            Hue::Blue => self.blue += 1,
        }
    }

    pub fn get(&self, hue: Hue) -> u32 {
        match hue {
            Hue::Red => self.red,
            Hue::Green => self.green,
            Hue::Blue => self.blue,
        }
    }

    pub fn clear(&mut self) {
        *self = Tally::default();
    }

    /// Final personality color.
    ///
    /// Red needs a strict lead over both others; otherwise Green needs a
    /// strict lead over Blue; Blue takes every remaining case, ties included.
    pub fn result(&self) -> Hue {
        if self.red > self.green && self.red > self.blue {
            Hue::Red
        } else if self.green > self.blue {
            Hue::Green
        } else {
            Hue::Blue
        }
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, hue) in Hue::ALL.into_iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}:{}", hue.name(), self.get(hue))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_way_tie_is_blue() {
        assert_eq!(Tally::new(2, 2, 2).result(), Hue::Blue);
    }

    #[test]
    fn strict_red_lead_is_red() {
        assert_eq!(Tally::new(3, 1, 1).result(), Hue::Red);
    }

    #[test]
    fn green_blue_tie_is_blue() {
        assert_eq!(Tally::new(1, 3, 3).result(), Hue::Blue);
    }

    #[test]
    fn green_lead_over_blue_is_green() {
        assert_eq!(Tally::new(1, 4, 2).result(), Hue::Green);
    }

    #[test]
    fn red_tied_with_green_falls_through() {
        assert_eq!(Tally::new(3, 3, 1).result(), Hue::Green);
        assert_eq!(Tally::new(3, 1, 3).result(), Hue::Blue);
    }

    #[test]
    fn empty_tally_is_blue() {
        assert_eq!(Tally::default().result(), Hue::Blue);
    }

    #[test]
    fn tables_cover_scored_levels_only() {
        assert_eq!(yes_choice(0), None);
        assert_eq!(yes_choice(1), Some(Hue::Blue));
        assert_eq!(no_choice(1), Some(Hue::Red));
        assert_eq!(yes_choice(4), Some(Hue::Green));
        assert_eq!(yes_choice(8), Some(Hue::Blue));
        assert_eq!(no_choice(8), None);
        for level in 9..=10 {
            assert_eq!(choice_for(level, DoorSide::Yes), None);
            assert_eq!(choice_for(level, DoorSide::No), None);
        }
    }

    #[test]
    fn tally_add_and_clear() {
        let mut t = Tally::default();
        t.add(Hue::Green);
        t.add(Hue::Green);
        t.add(Hue::Red);
        assert_eq!(t.get(Hue::Green), 2);
        assert_eq!(t.get(Hue::Red), 1);
        assert_eq!(t.to_string(), "Red:1 Green:2 Blue:0");
        t.clear();
        assert_eq!(t, Tally::default());
    }
}
