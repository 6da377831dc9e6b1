use anyhow::{
  Context,
  anyhow
};
use chrono::{
  Datelike,
  NaiveDate
};
use regex::Regex;

use crate::calendar::CalendarQuery;

const MONTH_NAMES: [&str; 12] = [
  "January",
  "February",
  "March",
  "April",
  "May",
  "June",
  "July",
  "August",
  "September",
  "October",
  "November",
  "December"
];

/// `"February 2024"`.
#[must_use]
pub fn month_title(
  query: &CalendarQuery
) -> String {
  let name = query
    .month
    .checked_sub(1)
    .and_then(|idx| {
      MONTH_NAMES.get(idx as usize)
    })
    .copied()
    .unwrap_or("?");
  format!("{name} {}", query.year)
}

#[must_use]
pub fn current_month(
  today: NaiveDate
) -> CalendarQuery {
  CalendarQuery {
    year:  i64::from(today.year()),
    month: today.month()
  }
}

#[tracing::instrument(skip(today), fields(input = input))]
pub fn parse_period(
  input: &str,
  today: NaiveDate
) -> anyhow::Result<CalendarQuery> {
  let lower =
    input.trim().to_ascii_lowercase();
  let this = current_month(today);

  match lower.as_str() {
    | "" | "this" | "now" | "today" => {
      return Ok(this);
    }
    | "next" => {
      return Ok(this.shifted(1));
    }
    | "prev" | "previous" | "last" => {
      return Ok(this.shifted(-1));
    }
    | _ => {}
  }

  let numeric_re = Regex::new(
    r"^(?P<year>[+-]?\d{1,18})[-/](?P<month>\d{1,2})$"
  )
  .map_err(|e| {
    anyhow!(
      "internal regex compile \
       failure: {e}"
    )
  })?;

  if let Some(caps) =
    numeric_re.captures(&lower)
  {
    let year: i64 = caps
      .name("year")
      .map(|m| m.as_str())
      .ok_or_else(|| {
        anyhow!("missing year")
      })?
      .parse()
      .context("invalid year")?;
    let month: u32 = caps
      .name("month")
      .map(|m| m.as_str())
      .ok_or_else(|| {
        anyhow!("missing month")
      })?
      .parse()
      .context("invalid month")?;
    return CalendarQuery::new(
      year, month
    )
    .with_context(|| {
      format!(
        "invalid period: {input}"
      )
    });
  }

  let mut tokens =
    lower.split_whitespace();
  if let Some(first) = tokens.next()
    && let Some(month) =
      parse_month_name(first)
  {
    let year = match tokens.next() {
      | Some(raw) => {
        raw.parse::<i64>().with_context(
          || {
            format!(
              "invalid year in period: \
               {input}"
            )
          }
        )?
      }
      | None => this.year
    };
    if tokens.next().is_some() {
      return Err(anyhow!(
        "unexpected trailing text in \
         period: {input}"
      ));
    }
    return Ok(CalendarQuery {
      year,
      month
    });
  }

  Err(anyhow!(
    "unrecognized period expression: \
     {input}"
  ))
  .with_context(|| {
    "supported formats: \
     this/now/today, next, \
     prev/previous/last, YYYY-MM, \
     YYYY/MM, month names (e.g. \
     march or mar 2024)"
  })
}

fn parse_month_name(
  token: &str
) -> Option<u32> {
  match token.trim() {
    | "january" | "jan" => Some(1),
    | "february" | "feb" => Some(2),
    | "march" | "mar" => Some(3),
    | "april" | "apr" => Some(4),
    | "may" => Some(5),
    | "june" | "jun" => Some(6),
    | "july" | "jul" => Some(7),
    | "august" | "aug" => Some(8),
    | "september" | "sep" | "sept" => {
      Some(9)
    }
    | "october" | "oct" => Some(10),
    | "november" | "nov" => Some(11),
    | "december" | "dec" => Some(12),
    | _ => None
  }
}
