use anyhow::Result;

use crate::search::{DatabaseEngine, Predicate};
use crate::{Customer, SearchCriteria, SearchEngine};

/// Example 01 – one free-text box searching ids, names, kana and e-mail.
pub fn run() -> Result<()> {
    let engine = SearchEngine::<Customer>::new(DatabaseEngine::Postgres);

    // Full-width spaces are stripped before matching.
    let criteria =
        SearchCriteria::from_json_str(r#"{"multi": "1024　", "sex": [1, 2], "pref": "13"}"#)?;
    let query = engine.build(&criteria);

    assert_eq!(query.normalized().get("multi").map(String::as_str), Some("1024"));
    let Some(Predicate::Or { children }) = query.conditions().first() else {
        anyhow::bail!("multi should produce a disjunction");
    };
    assert_eq!(children.len(), 4, "id, name, kana and e-mail branches");
    assert_eq!(children[0], Predicate::eq("c.id", 1024));
    assert!(query.conditions().contains(&Predicate::eq("c.pref_id", 13)));
    assert!(query.conditions().contains(&Predicate::in_list("c.sex_id", [1, 2])));

    // Customers carry no default status exclusion.
    assert_eq!(query.conditions().len(), 3);
    Ok(())
}
