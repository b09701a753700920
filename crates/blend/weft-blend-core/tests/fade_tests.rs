use weft_blend_core::{
    clip::ClipSource, config::Config, fade::FadeMode, graph::Graph, inputs::Inputs,
    outputs::CoreEvent, SourceId,
};
use weft_test_fixtures::{clip, ConstSource};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn graph_with_cfg(cfg: Config, names: &[&str]) -> (Graph, Vec<SourceId>) {
    let mut graph = Graph::new(cfg);
    let mut sources = Vec::new();
    for name in names {
        let fx = clip(name).expect("fixture clip");
        let id = graph
            .register_source(ClipSource::new(&fx.name, fx.length, fx.looping))
            .expect("valid fixture clip");
        sources.push(id);
    }
    (graph, sources)
}

fn graph_with(names: &[&str]) -> (Graph, Vec<SourceId>) {
    graph_with_cfg(Config::default(), names)
}

fn tick(graph: &mut Graph, dt: f32) -> weft_blend_core::Outputs {
    let mut sampler = ConstSource::new(1, 0.0);
    graph.evaluate(dt, Inputs::default(), &mut sampler).clone()
}

/// it should converge exactly at the target and detach from the group
#[test]
fn fade_converges_exactly() {
    let (mut graph, sources) = graph_with(&["walk"]);
    let base = graph.add_layer("base");
    let a = graph.add_node(base, sources[0]).unwrap();

    graph.start_fade(a, 1.0, 0.5).unwrap();
    assert!(graph.node(a).unwrap().fade().is_some());
    assert_eq!(graph.live_fade_count(), 1);

    tick(&mut graph, 0.25);
    approx(graph.node(a).unwrap().weight(), 0.5, 1e-5);

    let outputs = tick(&mut graph, 0.25);
    assert_eq!(graph.node(a).unwrap().weight(), 1.0);
    assert!(graph.node(a).unwrap().fade().is_none());
    assert_eq!(graph.live_fade_count(), 0);
    assert!(outputs
        .events
        .iter()
        .any(|e| matches!(e, CoreEvent::FadeCompleted { node } if *node == a)));
}

/// it should crossfade symmetrically under FixedDuration
#[test]
fn crossfade_fixed_duration() {
    let (mut graph, sources) = graph_with(&["walk", "run"]);
    let base = graph.add_layer("base");
    let a = graph.add_node(base, sources[0]).unwrap();
    let b = graph.add_node(base, sources[1]).unwrap();

    graph.play(base, a).unwrap();
    graph
        .play_with_fade(base, b, 1.0, FadeMode::FixedDuration)
        .unwrap();
    // One pooled group carries both ramps.
    assert_eq!(graph.live_fade_count(), 1);

    tick(&mut graph, 0.5);
    approx(graph.node(a).unwrap().weight(), 0.5, 1e-5);
    approx(graph.node(b).unwrap().weight(), 0.5, 1e-5);

    let outputs = tick(&mut graph, 0.5);
    let na = graph.node(a).unwrap();
    assert_eq!(na.weight(), 0.0);
    assert!(!na.is_playing());
    assert_eq!(na.clip.time, 0.0, "stop-on-zero rewinds in the same tick");
    let nb = graph.node(b).unwrap();
    assert_eq!(nb.weight(), 1.0);
    assert!(nb.is_playing());
    assert_eq!(graph.live_fade_count(), 0);
    assert!(outputs
        .events
        .iter()
        .any(|e| matches!(e, CoreEvent::NodeStopped { node } if *node == a)));
}

/// it should scale FixedSpeed fades by the remaining distance
#[test]
fn fixed_speed_scales_with_distance() {
    let (mut graph, sources) = graph_with(&["walk"]);
    let base = graph.add_layer("base");
    let a = graph.add_node(base, sources[0]).unwrap();

    // From weight 0.5, a FixedSpeed fade with duration 1 runs at 1/s and
    // arrives after 0.5s.
    graph.set_weight(a, 0.5).unwrap();
    graph
        .play_with_fade(base, a, 1.0, FadeMode::FixedSpeed)
        .unwrap();
    tick(&mut graph, 0.25);
    approx(graph.node(a).unwrap().weight(), 0.75, 1e-5);
    tick(&mut graph, 0.25);
    assert_eq!(graph.node(a).unwrap().weight(), 1.0);

    // The same start under FixedDuration takes the full second.
    graph.set_weight(a, 0.5).unwrap();
    graph
        .play_with_fade(base, a, 1.0, FadeMode::FixedDuration)
        .unwrap();
    tick(&mut graph, 0.5);
    approx(graph.node(a).unwrap().weight(), 0.75, 1e-5);
    tick(&mut graph, 0.5);
    assert_eq!(graph.node(a).unwrap().weight(), 1.0);
}

/// it should scale normalized fade durations by clip length
#[test]
fn normalized_duration_scales_with_length() {
    // "idle" is 2 seconds long; a NormalizedDuration fade of 0.5 takes
    // one wall-clock second.
    let (mut graph, sources) = graph_with(&["idle"]);
    let base = graph.add_layer("base");
    let a = graph.add_node(base, sources[0]).unwrap();

    graph
        .play_with_fade(base, a, 0.5, FadeMode::NormalizedDuration)
        .unwrap();
    tick(&mut graph, 0.5);
    approx(graph.node(a).unwrap().weight(), 0.5, 1e-5);
    tick(&mut graph, 0.5);
    assert_eq!(graph.node(a).unwrap().weight(), 1.0);
}

/// it should reuse pooled fade slots across transitions
#[test]
fn fade_pool_reuses_slots() {
    let mut cfg = Config::default();
    cfg.fade_pool_capacity = 1;
    let (mut graph, sources) = graph_with_cfg(cfg, &["walk", "run"]);
    let base = graph.add_layer("base");
    let a = graph.add_node(base, sources[0]).unwrap();
    let b = graph.add_node(base, sources[1]).unwrap();

    graph.play(base, a).unwrap();
    graph
        .play_with_fade(base, b, 0.5, FadeMode::FixedDuration)
        .unwrap();
    assert_eq!(graph.fade_pool_slots(), 1);
    tick(&mut graph, 0.5);
    assert_eq!(graph.live_fade_count(), 0);

    graph
        .play_with_fade(base, a, 0.5, FadeMode::FixedDuration)
        .unwrap();
    assert_eq!(graph.fade_pool_slots(), 1, "slot reused, pool did not grow");
    tick(&mut graph, 0.5);
    assert_eq!(graph.live_fade_count(), 0);
}

/// it should let a direct weight write win over an in-progress fade
#[test]
fn set_weight_cancels_fade() {
    let (mut graph, sources) = graph_with(&["walk", "run"]);
    let base = graph.add_layer("base");
    let a = graph.add_node(base, sources[0]).unwrap();
    let b = graph.add_node(base, sources[1]).unwrap();

    graph.play(base, a).unwrap();
    graph
        .play_with_fade(base, b, 1.0, FadeMode::FixedDuration)
        .unwrap();

    graph.set_weight(b, 0.25).unwrap();
    assert!(graph.node(b).unwrap().fade().is_none());

    // The rest of the group keeps fading; b holds its written weight.
    tick(&mut graph, 1.0);
    assert_eq!(graph.node(b).unwrap().weight(), 0.25);
    assert!(graph.node(b).unwrap().is_playing());
    assert_eq!(graph.node(a).unwrap().weight(), 0.0);
    assert!(!graph.node(a).unwrap().is_playing());
    assert_eq!(graph.live_fade_count(), 0);
}

/// it should restart a weightless node in place for FromStart fades
#[test]
fn from_start_reuses_weightless_self() {
    let (mut graph, sources) = graph_with(&["walk"]);
    let base = graph.add_layer("base");
    let a = graph.add_node(base, sources[0]).unwrap();

    graph.play(base, a).unwrap();
    tick(&mut graph, 0.5);
    assert_eq!(graph.node(a).unwrap().clip.time, 0.5);

    graph.set_weight(a, 0.05).unwrap();
    graph
        .play_with_fade(base, a, 1.0, FadeMode::FromStart)
        .unwrap();
    assert_eq!(graph.layer(base).unwrap().children().len(), 1, "no clone");
    assert_eq!(graph.node(a).unwrap().clip.time, 0.0, "restarted in place");
    assert!(graph.node(a).unwrap().is_playing());
}

/// it should bound the restart clone pool and reuse the lowest-weight clone
#[test]
fn from_start_clone_pool_is_bounded() {
    let (mut graph, sources) = graph_with(&["walk"]);
    let base = graph.add_layer("base");
    let t = graph.add_node(base, sources[0]).unwrap();
    let max_clones = graph.config().max_clones_per_source;
    assert_eq!(max_clones, 3);

    graph.play(base, t).unwrap();

    // Long fades (speed 0.01/s) so retriggering piles up weighted clones.
    graph
        .play_with_fade(base, t, 100.0, FadeMode::FromStart)
        .unwrap();
    tick(&mut graph, 48.0);
    graph
        .play_with_fade(base, t, 100.0, FadeMode::FromStart)
        .unwrap();
    tick(&mut graph, 24.0);
    graph
        .play_with_fade(base, t, 100.0, FadeMode::FromStart)
        .unwrap();
    tick(&mut graph, 13.0);

    let children = graph.layer(base).unwrap().children().to_vec();
    assert_eq!(children.len(), 1 + max_clones, "template plus three clones");
    let (c1, c2, c3) = (children[1], children[2], children[3]);
    assert_eq!(graph.node(c1).unwrap().clone_of(), Some(t));
    approx(graph.node(c1).unwrap().weight(), 0.11, 1e-3);
    approx(graph.node(c2).unwrap().weight(), 0.11, 1e-3);
    approx(graph.node(c3).unwrap().weight(), 0.13, 1e-3);

    // Make the reuse pick unambiguous, then retrigger past the cap: the
    // lowest-weight clone is rewound instead of growing the pool.
    graph.set_weight(c2, 0.2).unwrap();
    graph
        .play_with_fade(base, t, 100.0, FadeMode::FromStart)
        .unwrap();
    assert_eq!(
        graph.layer(base).unwrap().children().len(),
        1 + max_clones,
        "clone pool did not grow past its bound"
    );
    assert_eq!(graph.layer(base).unwrap().current(), Some(c1));
    assert_eq!(graph.node(c1).unwrap().clip.time, 0.0);
    assert!(graph.node(c1).unwrap().is_playing());
}

/// it should degrade to immediate play when the duration is not positive
#[test]
fn zero_duration_is_immediate() {
    let (mut graph, sources) = graph_with(&["walk", "run"]);
    let base = graph.add_layer("base");
    let a = graph.add_node(base, sources[0]).unwrap();
    let b = graph.add_node(base, sources[1]).unwrap();

    graph.play(base, a).unwrap();
    graph
        .play_with_fade(base, b, 0.0, FadeMode::FixedDuration)
        .unwrap();
    assert_eq!(graph.node(b).unwrap().weight(), 1.0);
    assert_eq!(graph.node(a).unwrap().weight(), 0.0);
    assert_eq!(graph.live_fade_count(), 0);
}

/// it should stop immediately when a zero-duration fade targets zero
#[test]
fn zero_duration_fade_to_zero_stops() {
    let (mut graph, sources) = graph_with(&["walk"]);
    let base = graph.add_layer("base");
    let a = graph.add_node(base, sources[0]).unwrap();

    graph.play(base, a).unwrap();
    tick(&mut graph, 0.3);
    graph.start_fade(a, 0.0, 0.0).unwrap();
    let na = graph.node(a).unwrap();
    assert_eq!(na.weight(), 0.0);
    assert!(!na.is_playing());
    assert_eq!(na.clip.time, 0.0);
}
