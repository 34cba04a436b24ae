use chrono::{Duration, Utc};
use taxatree_core::{
    AncestryChain, CacheKey, CachedTree, ChainLink, FileCache, SpeciesLink, TaxonRank,
    TaxonomyTree, TreeCache, TreeFilter,
};
use tempfile::TempDir;

fn create_test_cache() -> (FileCache, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let cache = FileCache::with_path(temp_dir.path(), 30);
    (cache, temp_dir)
}

fn sample_tree() -> TaxonomyTree {
    let chain = AncestryChain {
        ancestors: vec![
            ChainLink {
                rank: TaxonRank::Kingdom,
                taxon_id: Some(1),
                name: "Animalia".to_string(),
            },
            ChainLink {
                rank: TaxonRank::Phylum,
                taxon_id: Some(2),
                name: "Chordata".to_string(),
            },
        ],
        species: SpeciesLink {
            taxon_id: 42048,
            name: "Panthera leo".to_string(),
            common_name: "Lion".to_string(),
        },
    };
    TaxonomyTree::merge(&[chain], None)
}

#[test]
fn test_store_and_load_round_trip() {
    let (cache, _temp) = create_test_cache();
    let key = CacheKey::new("nature_fan", None);
    let tree = sample_tree();

    cache.store(&key, &tree).unwrap();

    let cached = cache.load(&key).unwrap().unwrap();
    assert_eq!(cached.tree, tree);
    assert!(Utc::now() - cached.fetched_at < Duration::minutes(1));
}

#[test]
fn test_load_missing_entry() {
    let (cache, _temp) = create_test_cache();
    let key = CacheKey::new("nobody", None);

    assert!(cache.load(&key).unwrap().is_none());
}

#[test]
fn test_key_stems_are_distinct() {
    let plain = CacheKey::new("nature_fan", None);
    let insects = CacheKey::new(
        "nature_fan",
        Some(TreeFilter {
            rank: TaxonRank::Class,
            taxon_id: 47158,
        }),
    );
    let fungi = CacheKey::new(
        "nature_fan",
        Some(TreeFilter {
            rank: TaxonRank::Kingdom,
            taxon_id: 47170,
        }),
    );
    let other_user = CacheKey::new("other_fan", None);

    let stems = [
        plain.file_stem(),
        insects.file_stem(),
        fungi.file_stem(),
        other_user.file_stem(),
    ];
    for (i, a) in stems.iter().enumerate() {
        for b in &stems[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn test_filtered_and_unfiltered_entries_coexist() {
    let (cache, _temp) = create_test_cache();
    let filter = TreeFilter {
        rank: TaxonRank::Class,
        taxon_id: 47158,
    };
    let plain_key = CacheKey::new("nature_fan", None);
    let filtered_key = CacheKey::new("nature_fan", Some(filter));

    cache.store(&plain_key, &sample_tree()).unwrap();
    cache.store(&filtered_key, &TaxonomyTree::new()).unwrap();

    assert_eq!(cache.load(&plain_key).unwrap().unwrap().tree, sample_tree());
    assert!(cache
        .load(&filtered_key)
        .unwrap()
        .unwrap()
        .tree
        .is_empty());
}

#[test]
fn test_stale_entry_is_a_miss() {
    let (cache, _temp) = create_test_cache();
    let key = CacheKey::new("nature_fan", None);

    let stale = CachedTree {
        fetched_at: Utc::now() - Duration::days(31),
        tree: sample_tree(),
    };
    let json = serde_json::to_string(&stale).unwrap();
    std::fs::write(cache.entry_path(&key), json).unwrap();

    assert!(cache.load(&key).unwrap().is_none());
}

#[test]
fn test_entry_within_max_age_is_a_hit() {
    let (cache, _temp) = create_test_cache();
    let key = CacheKey::new("nature_fan", None);

    let aging = CachedTree {
        fetched_at: Utc::now() - Duration::days(29),
        tree: sample_tree(),
    };
    let json = serde_json::to_string(&aging).unwrap();
    std::fs::write(cache.entry_path(&key), json).unwrap();

    assert!(cache.load(&key).unwrap().is_some());
}

#[test]
fn test_corrupt_entry_is_a_miss() {
    let (cache, _temp) = create_test_cache();
    let key = CacheKey::new("nature_fan", None);

    std::fs::write(cache.entry_path(&key), "not json {").unwrap();

    assert!(cache.load(&key).unwrap().is_none());
}

#[test]
fn test_invalidate_removes_entry() {
    let (cache, _temp) = create_test_cache();
    let key = CacheKey::new("nature_fan", None);

    cache.store(&key, &sample_tree()).unwrap();
    cache.invalidate(&key).unwrap();

    assert!(cache.load(&key).unwrap().is_none());
}

#[test]
fn test_invalidate_missing_entry_is_ok() {
    let (cache, _temp) = create_test_cache();
    let key = CacheKey::new("nature_fan", None);

    cache.invalidate(&key).unwrap();
}

#[test]
fn test_clear_removes_all_entries() {
    let (cache, temp) = create_test_cache();
    let first = CacheKey::new("nature_fan", None);
    let second = CacheKey::new("other_fan", None);

    cache.store(&first, &sample_tree()).unwrap();
    cache.store(&second, &sample_tree()).unwrap();

    // A stray non-cache file must survive the sweep.
    let stray = temp.path().join("notes.txt");
    std::fs::write(&stray, "keep me").unwrap();

    cache.clear().unwrap();

    assert!(cache.load(&first).unwrap().is_none());
    assert!(cache.load(&second).unwrap().is_none());
    assert!(stray.exists());
}

#[test]
fn test_clear_on_missing_directory_is_ok() {
    let temp_dir = TempDir::new().unwrap();
    let cache = FileCache::with_path(temp_dir.path().join("never-created"), 30);

    cache.clear().unwrap();
}

#[test]
fn test_store_creates_cache_directory() {
    let temp_dir = TempDir::new().unwrap();
    let nested = temp_dir.path().join("deep").join("cache");
    let cache = FileCache::with_path(&nested, 30);
    let key = CacheKey::new("nature_fan", None);

    cache.store(&key, &sample_tree()).unwrap();

    assert!(nested.exists());
    assert!(cache.load(&key).unwrap().is_some());
}
