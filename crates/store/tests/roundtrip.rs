//! Full save/load cycles over documents built through the model API

use anyhow::Result;
use word_model::{DocumentSession, Slot, WordFlags};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn build_document() -> Result<DocumentSession> {
    let mut session = DocumentSession::new();

    // Two pages, several families, one three-box chain.
    let alpha = session.words.create_word(1, 100.0, 100.0, "logos", WordFlags::default());
    let middle = session.words.add_child(alpha, Slot::Bottom, "word")?;
    session.words.add_child(middle, Slot::Bottom, "verbum")?;
    session.words.add_child(alpha, Slot::Top, "root")?;

    let beta = session.words.create_word(1, 300.0, 100.0, "arche", WordFlags::default());
    let gamma = session.words.create_word(
        2,
        80.0,
        60.0,
        "1",
        WordFlags {
            is_page_number: true,
            ..WordFlags::default()
        },
    );

    let line_one = session.lines.add_line(1, 120.0);
    let line_two = session.lines.add_line(2, 80.0);
    session.attach_root(line_one, alpha)?;
    session.attach_root(line_one, beta)?;
    session.attach_root(line_two, gamma)?;
    Ok(session)
}

#[test]
fn save_load_save_is_stable() -> Result<()> {
    init_tracing();
    let session = build_document()?;

    let saved = store::to_json(&store::snapshot(&session))?;
    let reloaded = store::restore(store::from_json(&saved)?)?;
    let saved_again = store::to_json(&store::snapshot(&reloaded))?;

    assert_eq!(saved, saved_again);
    Ok(())
}

#[test]
fn reloaded_document_answers_the_same_queries() -> Result<()> {
    init_tracing();
    let session = build_document()?;
    let reloaded = store::restore(store::from_json(&store::to_json(&store::snapshot(
        &session,
    ))?)?)?;

    assert_eq!(reloaded.words.len(), session.words.len());
    assert_eq!(reloaded.lines.len(), session.lines.len());
    assert_eq!(
        reloaded.words.roots_on_page(1).count(),
        session.words.roots_on_page(1).count()
    );

    for word in session.words.words() {
        let family = session.words.family(word.id);
        let reloaded_family = reloaded.words.family(word.id);
        assert_eq!(family.len(), reloaded_family.len());
        assert_eq!(session.words.root_of(word.id), reloaded.words.root_of(word.id));
    }

    for line in session.lines.lines() {
        let r = reloaded.lines.line(line.id).expect("line survives reload");
        assert_eq!(r.page, line.page);
        assert_eq!(r.y, line.y);
        // Attachment order is rebuilt in id order; compare as sets.
        let mut expected = line.attached.clone();
        let mut actual = r.attached.clone();
        expected.sort();
        actual.sort();
        assert_eq!(actual, expected);
    }
    Ok(())
}

#[test]
fn flags_survive_the_round_trip() -> Result<()> {
    init_tracing();
    let mut session = DocumentSession::new();
    let chapter = session.words.create_word(
        1,
        48.0,
        48.0,
        "I",
        WordFlags {
            is_chapter: true,
            is_greek_script: true,
            ..WordFlags::default()
        },
    );

    let reloaded = store::restore(store::from_json(&store::to_json(&store::snapshot(
        &session,
    ))?)?)?;
    let word = reloaded.words.get(chapter).expect("word survives reload");
    assert!(word.flags.is_chapter);
    assert!(word.flags.is_greek_script);
    assert!(word.is_constrained());
    Ok(())
}
