//! SSL Labs letter grades.
//!
//! Scores follow the SSL Labs server rating guide. Only the seven grades below
//! carry a score; `T`, `M`, `F`, an empty string, or anything else is treated as
//! ungraded and never takes part in aggregation.

/// Ceiling every valid score sits strictly below.
const SCORE_CEILING: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SslGrade {
    APlus,
    A,
    AMinus,
    B,
    C,
    D,
    E,
}

impl SslGrade {
    /// Grade reported for a domain that has no validly graded server.
    pub const DEFAULT: SslGrade = SslGrade::A;

    pub fn as_str(&self) -> &'static str {
        match self {
            SslGrade::APlus => "A+",
            SslGrade::A => "A",
            SslGrade::AMinus => "A-",
            SslGrade::B => "B",
            SslGrade::C => "C",
            SslGrade::D => "D",
            SslGrade::E => "E",
        }
    }

    pub fn score(&self) -> u8 {
        match self {
            SslGrade::APlus => 95,
            SslGrade::A => 85,
            SslGrade::AMinus => 80,
            SslGrade::B => 65,
            SslGrade::C => 50,
            SslGrade::D => 35,
            SslGrade::E => 20,
        }
    }
}

impl std::fmt::Display for SslGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SslGrade {
    type Err = String;

    /// Case-sensitive: SSL Labs always reports upper-case grades.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A+" => Ok(SslGrade::APlus),
            "A" => Ok(SslGrade::A),
            "A-" => Ok(SslGrade::AMinus),
            "B" => Ok(SslGrade::B),
            "C" => Ok(SslGrade::C),
            "D" => Ok(SslGrade::D),
            "E" => Ok(SslGrade::E),
            _ => Err(format!("Invalid SSL grade: {:?}", s)),
        }
    }
}

/// Numeric score of a raw grade string, `None` when the grade has no meaning.
pub fn score(grade: &str) -> Option<u8> {
    grade.parse::<SslGrade>().ok().map(|g| g.score())
}

pub fn is_valid(grade: &str) -> bool {
    grade.parse::<SslGrade>().is_ok()
}

/// Worst valid grade among `grades`, or [`SslGrade::DEFAULT`] when none is valid.
///
/// A grade only replaces the current minimum when its score is strictly lower,
/// so the first minimal grade encountered wins.
pub fn aggregate<'a, I>(grades: I) -> SslGrade
where
    I: IntoIterator<Item = &'a str>,
{
    let mut min_score = SCORE_CEILING;
    let mut min_grade = SslGrade::DEFAULT;

    for raw in grades {
        let Ok(grade) = raw.parse::<SslGrade>() else {
            continue;
        };
        if grade.score() < min_score {
            min_score = grade.score();
            min_grade = grade;
        }
    }

    min_grade
}
