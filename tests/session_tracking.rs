use roitrack::{
    BlockMatchConfig, BlockMatchSearch, Direction, ImageView, OwnedImage, Rect, ReferenceMode,
    RoiLocator, RoiTrackError, RoiTrackResult, SearchResult, SessionConfig, Status, Tick,
    TrackingSession, VecFrameSource,
};

/// Builds a frame with a solid block over a flat background.
fn frame_with_block(width: usize, height: usize, background: u8, block: u8, rect: Rect) -> OwnedImage {
    let mut data = vec![background; width * height];
    for y in 0..rect.height {
        for x in 0..rect.width {
            data[(rect.y as usize + y) * width + rect.x as usize + x] = block;
        }
    }
    OwnedImage::new(data, width, height).unwrap()
}

/// Paints an arbitrary texture at a location over a zero background.
fn frame_with_texture(width: usize, height: usize, texture: &[u8], tw: usize, at: (usize, usize)) -> Vec<u8> {
    let mut data = vec![0u8; width * height];
    let th = texture.len() / tw;
    for y in 0..th {
        for x in 0..tw {
            data[(at.1 + y) * width + at.0 + x] = texture[y * tw + x];
        }
    }
    data
}

fn block_matcher(radius: usize) -> Box<BlockMatchSearch> {
    Box::new(BlockMatchSearch::new(BlockMatchConfig {
        radius,
        ..BlockMatchConfig::default()
    }))
}

#[test]
fn forward_then_reverse_round_trip() {
    let seed = Rect::new(12, 8, 6, 6);
    let frames: Vec<OwnedImage> = (0..4)
        .map(|_| frame_with_block(40, 30, 20, 180, seed))
        .collect();
    let source = VecFrameSource::new(frames);

    let mut session =
        TrackingSession::new(source, block_matcher(3), seed, SessionConfig::default()).unwrap();

    let mut visited = Vec::new();
    loop {
        match session.advance().unwrap() {
            Tick::Tracked(result) => {
                assert_eq!(result.rect, seed, "static scene must not move the rect");
                assert_eq!(result.error, 0);
                assert_eq!(result.mean_error, 0.0);
                visited.push((result.frame_index, result.direction));
            }
            Tick::Lost { frame_index } => panic!("unexpected loss at frame {frame_index}"),
            Tick::Terminated => break,
        }
    }

    let forward: Vec<usize> = visited
        .iter()
        .filter(|(_, d)| *d == Direction::Forward)
        .map(|(i, _)| *i)
        .collect();
    let reverse: Vec<usize> = visited
        .iter()
        .filter(|(_, d)| *d == Direction::Reverse)
        .map(|(i, _)| *i)
        .collect();
    assert_eq!(forward, vec![0, 1, 2, 3]);
    assert_eq!(reverse, vec![3, 2, 1, 0]);

    assert!(session.is_terminated());
    assert_eq!(session.advance().unwrap(), Tick::Terminated);
}

#[test]
fn follows_a_block_moving_right() {
    let seed = Rect::new(10, 8, 6, 6);
    let frames: Vec<OwnedImage> = (0..5)
        .map(|i| frame_with_block(60, 30, 0, 200, Rect::new(10 + 2 * i, 8, 6, 6)))
        .collect();
    let source = VecFrameSource::new(frames);

    let mut session =
        TrackingSession::new(source, block_matcher(3), seed, SessionConfig::default()).unwrap();

    for i in 0..5i32 {
        match session.advance().unwrap() {
            Tick::Tracked(result) => {
                assert_eq!(result.rect, Rect::new(10 + 2 * i, 8, 6, 6));
            }
            other => panic!("expected a tracked frame, got {other:?}"),
        }
    }
    assert_eq!(session.current_rect(), Rect::new(18, 8, 6, 6));
    assert_eq!(session.status(), Status::Active);
}

#[test]
fn loss_is_reported_every_tick_and_reset_recovers() {
    let seed = Rect::new(12, 8, 6, 6);
    // The bright block is swapped for a dimmer one in frame 2 and stays dim,
    // so re-seeding from the lost frame can pick the new appearance up.
    let frames = vec![
        frame_with_block(40, 30, 20, 180, seed),
        frame_with_block(40, 30, 20, 180, seed),
        frame_with_block(40, 30, 20, 90, seed),
        frame_with_block(40, 30, 20, 90, seed),
    ];
    let source = VecFrameSource::new(frames);

    let config = SessionConfig {
        max_mean_error: Some(100.0),
        ..SessionConfig::default()
    };
    let mut session = TrackingSession::new(source, block_matcher(3), seed, config).unwrap();

    assert!(matches!(session.advance().unwrap(), Tick::Tracked(_)));
    assert!(matches!(session.advance().unwrap(), Tick::Tracked(_)));

    // Frame 2: the best candidate is far above the quality ceiling.
    assert_eq!(session.advance().unwrap(), Tick::Lost { frame_index: 2 });
    assert_eq!(session.status(), Status::Lost);

    // No re-acquisition: the same loss is reported tick after tick.
    for _ in 0..3 {
        assert_eq!(session.advance().unwrap(), Tick::Lost { frame_index: 2 });
    }

    // Re-seeding from the retained frame returns the session to Active.
    session.reset(seed).unwrap();
    assert_eq!(session.status(), Status::Active);
    match session.advance().unwrap() {
        Tick::Tracked(result) => {
            assert_eq!(result.frame_index, 3);
            assert_eq!(result.rect, seed);
        }
        other => panic!("expected recovery on frame 3, got {other:?}"),
    }
}

#[test]
fn capped_retention_ends_reverse_playback_early() {
    let seed = Rect::new(12, 8, 6, 6);
    let frames: Vec<OwnedImage> = (0..5)
        .map(|_| frame_with_block(40, 30, 20, 180, seed))
        .collect();
    let source = VecFrameSource::new(frames);

    let config = SessionConfig {
        retain_capacity: Some(2),
        ..SessionConfig::default()
    };
    let mut session = TrackingSession::new(source, block_matcher(3), seed, config).unwrap();

    let mut visited = Vec::new();
    loop {
        match session.advance().unwrap() {
            Tick::Tracked(result) => visited.push((result.frame_index, result.direction)),
            Tick::Lost { frame_index } => panic!("unexpected loss at frame {frame_index}"),
            Tick::Terminated => break,
        }
    }

    let reverse: Vec<usize> = visited
        .iter()
        .filter(|(_, d)| *d == Direction::Reverse)
        .map(|(i, _)| *i)
        .collect();
    // Only the two newest frames were retained.
    assert_eq!(reverse, vec![4, 3]);
}

#[test]
fn seed_outside_the_frame_is_rejected() {
    let frames = vec![frame_with_block(40, 30, 0, 100, Rect::new(5, 5, 6, 6))];
    let source = VecFrameSource::new(frames);

    let seed = Rect::new(38, 5, 6, 6);
    let err = TrackingSession::new(source, block_matcher(3), seed, SessionConfig::default())
        .err()
        .unwrap();
    assert_eq!(
        err,
        RoiTrackError::InvalidSeed {
            x: 38,
            y: 5,
            width: 6,
            height: 6,
            img_width: 40,
            img_height: 30,
        }
    );
}

#[test]
fn empty_stream_cannot_start_a_session() {
    let source = VecFrameSource::new(Vec::new());
    let err = TrackingSession::new(
        source,
        block_matcher(3),
        Rect::new(0, 0, 4, 4),
        SessionConfig::default(),
    )
    .err()
    .unwrap();
    assert!(matches!(err, RoiTrackError::SourceFailure { .. }));
}

#[test]
fn reset_after_termination_fails() {
    let seed = Rect::new(4, 4, 4, 4);
    let frames = vec![frame_with_block(20, 20, 0, 90, seed)];
    let source = VecFrameSource::new(frames);

    let mut session =
        TrackingSession::new(source, block_matcher(2), seed, SessionConfig::default()).unwrap();
    while session.advance().unwrap() != Tick::Terminated {}

    assert_eq!(
        session.reset(seed).err().unwrap(),
        RoiTrackError::SessionTerminated
    );
}

#[test]
fn pinned_and_drifting_references_diverge_on_a_morphing_target() {
    // Texture A seeds the session; A' is A with one pixel brightened. The
    // middle frame shows A' at the seed location, so a drifting reference
    // re-anchors on A' while a pinned reference keeps A. The final frame
    // offers both, equidistant from the prior, and each mode snaps to its
    // own exact copy.
    let tw = 6;
    let texture_a: Vec<u8> = (0..36).map(|i| 50 + (i as u8) * 3).collect();
    let mut texture_a2 = texture_a.clone();
    texture_a2[0] += 40;

    let mut final_frame = frame_with_texture(40, 30, &texture_a, tw, (4, 10));
    let a2_overlay = frame_with_texture(40, 30, &texture_a2, tw, (16, 10));
    for (dst, src) in final_frame.iter_mut().zip(a2_overlay.iter()) {
        *dst = (*dst).max(*src);
    }

    let frames = vec![
        OwnedImage::new(frame_with_texture(40, 30, &texture_a, tw, (10, 10)), 40, 30).unwrap(),
        OwnedImage::new(frame_with_texture(40, 30, &texture_a2, tw, (10, 10)), 40, 30).unwrap(),
        OwnedImage::new(final_frame, 40, 30).unwrap(),
    ];
    let seed = Rect::new(10, 10, 6, 6);

    let mut endpoints = Vec::new();
    for mode in [ReferenceMode::Drifting, ReferenceMode::Pinned] {
        let locator = Box::new(BlockMatchSearch::new(BlockMatchConfig {
            radius: 6,
            reference: mode,
            ..BlockMatchConfig::default()
        }));
        let source = VecFrameSource::new(frames.clone());
        let mut session =
            TrackingSession::new(source, locator, seed, SessionConfig::default()).unwrap();
        for _ in 0..3 {
            match session.advance().unwrap() {
                Tick::Tracked(_) => {}
                other => panic!("expected tracking to continue, got {other:?}"),
            }
        }
        endpoints.push(session.current_rect().x);
    }

    assert_eq!(endpoints, vec![16, 4]);
}

/// Scripted locator standing in for a delegate tracker.
struct ScriptedLocator {
    fail_after: usize,
    calls: usize,
}

impl RoiLocator for ScriptedLocator {
    fn init(&mut self, _frame: ImageView<'_>, _seed: Rect) -> RoiTrackResult<()> {
        Ok(())
    }

    fn locate(&mut self, _frame: ImageView<'_>, prior: Rect) -> RoiTrackResult<SearchResult> {
        self.calls += 1;
        if self.calls > self.fail_after {
            return Err(RoiTrackError::NoValidCandidate);
        }
        Ok(SearchResult {
            x: prior.x + 1,
            y: prior.y,
            error: 0,
            area: prior.area(),
        })
    }
}

#[test]
fn any_locator_can_drive_the_session() {
    let seed = Rect::new(5, 5, 4, 4);
    let frames: Vec<OwnedImage> = (0..6)
        .map(|_| OwnedImage::new(vec![0u8; 30 * 30], 30, 30).unwrap())
        .collect();
    let source = VecFrameSource::new(frames);

    let locator = Box::new(ScriptedLocator {
        fail_after: 2,
        calls: 0,
    });
    let mut session =
        TrackingSession::new(source, locator, seed, SessionConfig::default()).unwrap();

    // Two scripted steps of +1 in x, then the delegate gives up.
    assert!(matches!(session.advance().unwrap(), Tick::Tracked(_)));
    assert!(matches!(session.advance().unwrap(), Tick::Tracked(_)));
    assert_eq!(session.current_rect(), Rect::new(7, 5, 4, 4));
    assert_eq!(session.advance().unwrap(), Tick::Lost { frame_index: 2 });
    assert_eq!(session.advance().unwrap(), Tick::Lost { frame_index: 2 });
}
