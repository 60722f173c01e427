//! Filename templates.
//!
//! A template is plain text with `$`-placeholders, e.g. `dump-$year$month$day-${index}.ndjson`:
//!
//! + `$name` or `${name}` substitutes the field `name`
//! + `$$` is a literal `$`
//!
//! The recognized fields are `year`, `month`, `day`, `hour`, `minute`, `second` (UTC, all but
//! `year` zero-padded to 2 digits), `uuid`, `index` and `host`. Anything else is rejected when the
//! template is compiled, so a bad template fails before any I/O happens.

use nom::{
    branch::alt,
    bytes::complete::{is_not, tag},
    character::complete::{alpha1, alphanumeric1, char},
    combinator::{map, recognize},
    multi::{many0, many0_count},
    sequence::{delimited, pair, preceded},
    IResult,
};
use std::{fmt::Display, str::FromStr, sync::Arc};
use time::OffsetDateTime;

use crate::TemplateErr;

/// One random uuid per unit.
pub const DEFAULT_TEMPLATE: &str = "$uuid";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Field {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Uuid,
    Index,
    Host,
}

/// A compiled filename template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field(Field),
}

enum Token<'a> {
    Text(&'a str),
    Name(&'a str),
}

/// Where the non-deterministic parts of a filename come from.
pub trait NameEnv: Send + Sync {
    /// Wall-clock time, in UTC.
    fn now(&self) -> OffsetDateTime;

    /// A fresh unique identifier. Called once per generated name.
    fn uuid(&self) -> String;

    /// The network name of this machine.
    fn host(&self) -> &str;
}

/// The real clock, random v4 uuids and the host name resolved at construction.
#[derive(Debug, Clone)]
pub struct SystemEnv {
    host: String,
}

/// Fixed values; useful in tests.
#[derive(Debug, Clone)]
pub struct FixedEnv {
    pub now: OffsetDateTime,
    pub uuid: String,
    pub host: String,
}

#[derive(Clone)]
/// Produces unit names from a [`Template`] and a rotation index.
pub struct FilenameGenerator {
    template: Template,
    env: Arc<dyn NameEnv>,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
            Self::Uuid => "uuid",
            Self::Index => "index",
            Self::Host => "host",
        }
    }
}

impl FromStr for Field {
    type Err = TemplateErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "year" => Self::Year,
            "month" => Self::Month,
            "day" => Self::Day,
            "hour" => Self::Hour,
            "minute" => Self::Minute,
            "second" => Self::Second,
            "uuid" => Self::Uuid,
            "index" => Self::Index,
            "host" => Self::Host,
            other => return Err(TemplateErr::UnknownField(other.to_owned())),
        })
    }
}

impl Template {
    pub fn compile(source: &str) -> Result<Self, TemplateErr> {
        let (rest, tokens) =
            many0(token)(source).map_err(|_| TemplateErr::InvalidPlaceholder(0))?;
        if !rest.is_empty() {
            return Err(TemplateErr::InvalidPlaceholder(source.len() - rest.len()));
        }

        let mut segments: Vec<Segment> = Vec::new();
        for token in tokens {
            match token {
                Token::Text(text) => match segments.last_mut() {
                    Some(Segment::Text(prev)) => prev.push_str(text),
                    _ => segments.push(Segment::Text(text.to_owned())),
                },
                Token::Name(name) => segments.push(Segment::Field(name.parse()?)),
            }
        }

        Ok(Self {
            source: source.to_owned(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The fields referenced by this template, in order of appearance.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Field(f) => Some(*f),
            Segment::Text(_) => None,
        })
    }

    /// Substitute every field. The clock is read once per call.
    pub fn render(&self, index: u64, env: &dyn NameEnv) -> String {
        let now = env.now();
        let mut name = String::new();
        for segment in self.segments.iter() {
            match segment {
                Segment::Text(text) => name.push_str(text),
                Segment::Field(field) => match field {
                    Field::Year => name.push_str(&now.year().to_string()),
                    Field::Month => name.push_str(&format!("{:02}", u8::from(now.month()))),
                    Field::Day => name.push_str(&format!("{:02}", now.day())),
                    Field::Hour => name.push_str(&format!("{:02}", now.hour())),
                    Field::Minute => name.push_str(&format!("{:02}", now.minute())),
                    Field::Second => name.push_str(&format!("{:02}", now.second())),
                    Field::Uuid => name.push_str(&env.uuid()),
                    Field::Index => name.push_str(&index.to_string()),
                    Field::Host => name.push_str(env.host()),
                },
            }
        }
        name
    }
}

impl Default for Template {
    fn default() -> Self {
        Self {
            source: DEFAULT_TEMPLATE.to_owned(),
            segments: vec![Segment::Field(Field::Uuid)],
        }
    }
}

impl FromStr for Template {
    type Err = TemplateErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

impl Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl SystemEnv {
    /// Resolves the host name; it is reused for every name generated afterwards.
    pub fn new() -> std::io::Result<Self> {
        let host = hostname::get()?.to_string_lossy().into_owned();
        Ok(Self { host })
    }
}

impl NameEnv for SystemEnv {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }

    fn uuid(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }

    fn host(&self) -> &str {
        &self.host
    }
}

impl NameEnv for FixedEnv {
    fn now(&self) -> OffsetDateTime {
        self.now
    }

    fn uuid(&self) -> String {
        self.uuid.clone()
    }

    fn host(&self) -> &str {
        &self.host
    }
}

impl FilenameGenerator {
    pub fn new(template: Template, env: Arc<dyn NameEnv>) -> Self {
        Self { template, env }
    }

    pub fn generate(&self, index: u64) -> String {
        self.template.render(index, self.env.as_ref())
    }

    pub fn template(&self) -> &Template {
        &self.template
    }
}

impl std::fmt::Debug for FilenameGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilenameGenerator")
            .field("template", &self.template)
            .field("env", &"{ ... }")
            .finish()
    }
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0_count(alt((alphanumeric1, tag("_")))),
    ))(input)
}

fn token(input: &str) -> IResult<&str, Token<'_>> {
    alt((
        map(tag("$$"), |_| Token::Text("$")),
        map(delimited(tag("${"), identifier, char('}')), Token::Name),
        map(preceded(char('$'), identifier), Token::Name),
        map(is_not("$"), Token::Text),
    ))(input)
}
