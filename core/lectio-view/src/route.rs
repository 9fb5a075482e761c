use nom::{
    bytes::complete::{take_while, take_while1},
    character::complete::char,
    combinator::{opt, rest},
    multi::separated_list0,
    sequence::{pair, preceded},
    IResult,
};

use lectio_protocol::BookId;
use serde::Serialize;

pub const DEFAULT_BOOK: BookId = BookId(1);
pub const DEFAULT_UNIT: &str = "1.1";
pub const LOGIN_PATH: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Route {
    Login,
    Books,
    Unit { book: BookId, unit: String },
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Navigation {
    Render(Route),
    Redirect(&'static str),
}

type Param<'a> = (&'a str, Option<&'a str>);

fn param(input: &str) -> IResult<&str, Param<'_>> {
    pair(
        take_while1(|c: char| c != '=' && c != '&'),
        opt(preceded(char('='), take_while(|c: char| c != '&'))),
    )(input)
}

/// Parses `a=1&b=2` (a leading `?` is allowed). Values are not percent-decoded.
pub fn parse_query(query: &str) -> Vec<Param<'_>> {
    let query = query.strip_prefix('?').unwrap_or(query);
    let parsed: IResult<&str, (Vec<Param>, &str)> =
        pair(separated_list0(char('&'), param), rest)(query);
    match parsed {
        Ok((_, (params, _))) => params,
        Err(_) => Vec::new(),
    }
}

fn query_value<'a>(params: &[Param<'a>], key: &str) -> Option<&'a str> {
    params.iter().find(|(k, _)| *k == key).and_then(|(_, v)| *v)
}

pub fn parse_route(path: &str, query: &str) -> Route {
    match path {
        "/" | "/index.html" => Route::Login,
        "/books" | "/books.html" => Route::Books,
        "/unit" | "/unit.html" => {
            let params = parse_query(query);
            // Missing, non-numeric or zero book ids fall back to the first book
            let book = query_value(&params, "book")
                .and_then(|v| v.trim().parse::<u32>().ok())
                .filter(|id| *id != 0)
                .map(BookId)
                .unwrap_or(DEFAULT_BOOK);
            let unit = query_value(&params, "unit")
                .filter(|v| !v.is_empty())
                .unwrap_or(DEFAULT_UNIT)
                .to_string();
            Route::Unit { book, unit }
        }
        _ => Route::NotFound,
    }
}

/// Every page except login requires a stored identity.
pub fn resolve(path: &str, query: &str, has_profile: bool) -> Navigation {
    let route = parse_route(path, query);
    if !has_profile && route != Route::Login {
        return Navigation::Redirect(LOGIN_PATH);
    }
    Navigation::Render(route)
}

pub fn unit_href(book: BookId, unit: &str) -> String {
    format!("/unit?book={}&unit={}", book, unit)
}
