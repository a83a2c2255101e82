use std::collections::HashSet;

use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::models::{Match, NewLike, NewMatch, NewPass, UserId};
use crate::schema::{likes, matches, passes};

use super::now;

/// Order a pair so `(a, b)` and `(b, a)` address the same match row.
pub fn canonical_pair(a: UserId, b: UserId) -> (UserId, UserId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Returns `true` if the like was inserted, `false` if it already existed.
pub fn record_like(conn: &mut SqliteConnection, liker: UserId, liked: UserId) -> QueryResult<bool> {
    let inserted = diesel::insert_or_ignore_into(likes::table)
        .values(&NewLike {
            liker_id: liker,
            liked_id: liked,
            created_at: now(),
        })
        .execute(conn)?;
    Ok(inserted > 0)
}

/// Returns `true` if the pass was inserted, `false` if it already existed.
pub fn record_pass(conn: &mut SqliteConnection, passer: UserId, passed: UserId) -> QueryResult<bool> {
    let inserted = diesel::insert_or_ignore_into(passes::table)
        .values(&NewPass {
            passer_id: passer,
            passed_id: passed,
            created_at: now(),
        })
        .execute(conn)?;
    Ok(inserted > 0)
}

pub fn has_liked(conn: &mut SqliteConnection, liker: UserId, liked: UserId) -> QueryResult<bool> {
    diesel::select(exists(
        likes::table
            .filter(likes::liker_id.eq(liker))
            .filter(likes::liked_id.eq(liked)),
    ))
    .get_result(conn)
}

pub fn has_passed(conn: &mut SqliteConnection, passer: UserId, passed: UserId) -> QueryResult<bool> {
    diesel::select(exists(
        passes::table
            .filter(passes::passer_id.eq(passer))
            .filter(passes::passed_id.eq(passed)),
    ))
    .get_result(conn)
}

/// Whether `b` already liked `a`, i.e. whether `a` liking `b` closes a mutual pair.
pub fn reciprocal_like_exists(conn: &mut SqliteConnection, a: UserId, b: UserId) -> QueryResult<bool> {
    has_liked(conn, b, a)
}

/// Returns `true` if a new match row was written.
pub fn record_match(conn: &mut SqliteConnection, a: UserId, b: UserId) -> QueryResult<bool> {
    let (user_a_id, user_b_id) = canonical_pair(a, b);
    let inserted = diesel::insert_or_ignore_into(matches::table)
        .values(&NewMatch {
            user_a_id,
            user_b_id,
            created_at: now(),
        })
        .execute(conn)?;
    Ok(inserted > 0)
}

pub fn match_exists(conn: &mut SqliteConnection, a: UserId, b: UserId) -> QueryResult<bool> {
    let (user_a_id, user_b_id) = canonical_pair(a, b);
    diesel::select(exists(
        matches::table
            .filter(matches::user_a_id.eq(user_a_id))
            .filter(matches::user_b_id.eq(user_b_id)),
    ))
    .get_result(conn)
}

/// Everyone `user_id` has liked or passed.
pub fn acted_on(conn: &mut SqliteConnection, user_id: UserId) -> QueryResult<HashSet<UserId>> {
    let mut ids: HashSet<UserId> = likes::table
        .filter(likes::liker_id.eq(user_id))
        .select(likes::liked_id)
        .load::<UserId>(conn)?
        .into_iter()
        .collect();

    ids.extend(
        passes::table
            .filter(passes::passer_id.eq(user_id))
            .select(passes::passed_id)
            .load::<UserId>(conn)?,
    );

    Ok(ids)
}

/// Matches involving `user_id`, newest first.
pub fn list_matches(conn: &mut SqliteConnection, user_id: UserId) -> QueryResult<Vec<Match>> {
    matches::table
        .filter(
            matches::user_a_id
                .eq(user_id)
                .or(matches::user_b_id.eq(user_id)),
        )
        .order(matches::created_at.desc())
        .load::<Match>(conn)
}
