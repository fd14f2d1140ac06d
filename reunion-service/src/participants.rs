//! Codec for the comma-joined `user_ids` column.
//!
//! The column is a single TEXT value, not a join table. An empty string
//! means no participants; splitting drops empty tokens so a stray
//! delimiter never manufactures a phantom participant.

/// Join participant ids into the stored column form.
pub fn join_ids(ids: &[String]) -> String {
    ids.join(",")
}

/// Split the stored column form back into participant ids.
pub fn split_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_column_is_empty_list() {
        assert!(split_ids("").is_empty());
    }

    #[test]
    fn join_then_split_preserves_order_and_duplicates() {
        let ids = vec!["u1".to_string(), "u2".to_string(), "u1".to_string()];
        assert_eq!(join_ids(&ids), "u1,u2,u1");
        assert_eq!(split_ids("u1,u2,u1"), ids);
    }

    #[test]
    fn stray_delimiters_are_ignored() {
        assert_eq!(split_ids(",u1,,u2,"), vec!["u1", "u2"]);
    }
}
