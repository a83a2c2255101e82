use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::models::{NewProfile, Profile, UserId};
use crate::schema::profiles;

/// Insert or fully replace the profile for `profile.user_id`.
pub fn save_profile(conn: &mut SqliteConnection, profile: &NewProfile<'_>) -> QueryResult<()> {
    diesel::replace_into(profiles::table)
        .values(profile)
        .execute(conn)?;

    tracing::debug!(user_id = profile.user_id, "profile saved");
    Ok(())
}

pub fn get_profile(conn: &mut SqliteConnection, user_id: UserId) -> QueryResult<Option<Profile>> {
    profiles::table
        .find(user_id)
        .first::<Profile>(conn)
        .optional()
}

/// Every profile except `user_id`, in identity order.
pub fn list_profiles_except(conn: &mut SqliteConnection, user_id: UserId) -> QueryResult<Vec<Profile>> {
    profiles::table
        .filter(profiles::user_id.ne(user_id))
        .order(profiles::user_id.asc())
        .load::<Profile>(conn)
}

/// Batch lookup, used to decorate match listings.
pub fn get_profiles(conn: &mut SqliteConnection, user_ids: &[UserId]) -> QueryResult<Vec<Profile>> {
    if user_ids.is_empty() {
        return Ok(vec![]);
    }
    profiles::table
        .filter(profiles::user_id.eq_any(user_ids))
        .load::<Profile>(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support;

    #[test]
    fn absent_profile_is_none_not_an_error() {
        let pool = test_support::pool();
        let mut conn = pool.get().unwrap();
        assert_eq!(get_profile(&mut conn, 42).unwrap(), None);
    }

    #[test]
    fn saving_twice_replaces_the_whole_record() {
        let pool = test_support::pool();
        let mut conn = pool.get().unwrap();

        let mut first = test_support::profile(1, Some(30), "Male", "Female", "music, chess");
        first.handle = Some("old_handle".into());
        test_support::insert(&mut conn, &first);

        let second = test_support::profile(1, Some(31), "Male", "Any", "");
        test_support::insert(&mut conn, &second);

        let stored = get_profile(&mut conn, 1).unwrap().unwrap();
        assert_eq!(stored.age, Some(31));
        assert_eq!(stored.preference, "Any");
        assert_eq!(stored.interests, "");
        assert_eq!(stored.handle, None);

        let count: i64 = profiles::table.count().get_result(&mut conn).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn listing_skips_the_requester_and_keeps_id_order() {
        let pool = test_support::pool();
        let mut conn = pool.get().unwrap();
        for id in [5, 2, 9] {
            test_support::insert(&mut conn, &test_support::profile(id, Some(25), "Female", "Any", ""));
        }

        let ids: Vec<UserId> = list_profiles_except(&mut conn, 5)
            .unwrap()
            .into_iter()
            .map(|p| p.user_id)
            .collect();
        assert_eq!(ids, vec![2, 9]);

        let batch = get_profiles(&mut conn, &[9, 404]).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].user_id, 9);
    }
}
