//! Integration tests for the pose algebra and layering laws.

use std::sync::Arc;

use glam::{Quat, Vec3};
use pretty_assertions::assert_eq;
use skelmix_pose::{
    BoneInfo, BoneMask, Clip, Disc, DiscClips, DiscConfig, Hierarchy, LayerFlags, Pose, Skeleton,
    Transform,
};

const EPS: f32 = 1e-5;

/// Deterministic, varied transform for bone `i` of pose `seed`
fn transform(seed: u32, i: usize) -> Transform {
    let k = seed as f32 * 1.37 + i as f32 * 0.71;
    Transform::new(
        Vec3::new(k.sin() * 2.0, (k * 1.3).cos(), (k * 0.7).sin() * 3.0),
        Quat::from_euler(glam::EulerRot::XYZ, k.sin(), (k * 0.5).cos(), k * 0.3).normalize(),
        Vec3::new(1.0 + 0.2 * k.sin().abs(), 1.0, 0.8 + 0.1 * k.cos().abs()),
    )
}

fn pose(seed: u32, bones: usize) -> Pose {
    (0..bones).map(|i| transform(seed, i)).collect()
}

/// Children stored before parents, two roots
fn scrambled() -> Hierarchy {
    Hierarchy::new(vec![
        BoneInfo::new("Hand", 3),
        BoneInfo::new("Head", 2),
        BoneInfo::new("Spine", 4),
        BoneInfo::new("Arm", 2),
        BoneInfo::new("Hips", -1),
        BoneInfo::new("Prop", -1),
        BoneInfo::new("PropTip", 5),
    ])
    .unwrap()
}

fn chain(length: usize) -> Hierarchy {
    let bones = (0..length)
        .map(|i| BoneInfo::new(format!("bone{i}"), i as i32 - 1))
        .collect();
    Hierarchy::new(bones).unwrap()
}

#[test]
fn test_local_global_round_trip() {
    for hierarchy in [scrambled(), chain(12)] {
        for seed in 0..4 {
            let global = pose(seed, hierarchy.len());
            let back = global.to_local(&hierarchy).to_global(&hierarchy);
            for (a, b) in global.iter().zip(back.iter()) {
                assert!(a.abs_diff_eq(b, EPS), "{a:?} != {b:?}");
            }
        }
    }
}

#[test]
fn test_lerp_endpoints() {
    let a = pose(1, 7);
    let b = pose(2, 7);
    assert_eq!(a.lerp(&b, 0.0), a);
    assert_eq!(a.lerp(&b, 1.0), b);
}

#[test]
fn test_override_keeps_masked_out_bones_exactly() {
    let a = pose(3, 7);
    let b = pose(4, 7);
    let mask = BoneMask::from_weights(vec![0.0, 1.0, 0.0, 0.5, 0.0, 1.0, 0.0]);

    for factor in [0.0, 0.3, 1.0, 2.5] {
        let blended = a.override_blend(&b, factor, Some(&mask));
        for bone in [0, 2, 4, 6] {
            assert_eq!(blended[bone], a[bone]);
        }
    }
}

#[test]
fn test_additive_round_trip() {
    let hierarchy = scrambled();
    for seed in 0..4 {
        let reference = pose(seed, hierarchy.len());
        let target = pose(seed + 10, hierarchy.len());
        let delta = target.generate_additive(&reference);

        let ones = BoneMask::ones(hierarchy.len());
        let recovered = reference.additive_blend(&delta, 1.0, 1.0, Some(&ones));
        assert!(recovered.abs_diff_eq(&target, EPS));

        let recovered = reference.additive_blend(&delta, 1.0, 1.0, None);
        assert!(recovered.abs_diff_eq(&target, EPS));
    }
}

#[test]
fn test_additive_half_weight_mirrored_delta() {
    let base = Pose::from_transforms(vec![Transform::from_translation(Vec3::Y)]);
    let delta = Pose::from_transforms(vec![Transform::from_scale(Vec3::new(-1.0, 4.0, 1.0))]);

    let blended = base.additive_blend(&delta, 1.0, 0.5, None);
    let bone = blended[0];
    assert!(bone.is_finite());
    assert!(bone.scale.abs_diff_eq(Vec3::new(-1.0, 2.0, 1.0), EPS));
    assert!(bone.translation.abs_diff_eq(Vec3::Y, EPS));
}

#[test]
fn test_apply_clip_frame_wrap() {
    let hierarchy = chain(3);
    let bind = pose(0, 3);
    let frames: Vec<Pose> = (1..=5).map(|seed| pose(seed, 3)).collect();
    let clip = Clip::new("cycle", 3, frames).unwrap();
    let count = clip.frame_count() as i32;

    let mut skeleton = Skeleton::new(hierarchy, bind).unwrap();

    skeleton.apply_clip(&clip, 0);
    let first = skeleton.pose().clone();
    skeleton.apply_clip(&clip, count);
    assert_eq!(skeleton.pose(), &first);

    skeleton.apply_clip(&clip, 2);
    let third = skeleton.pose().clone();
    skeleton.apply_clip(&clip, count * 3 + 2);
    assert_eq!(skeleton.pose(), &third);
}

#[test]
fn test_empty_clip_is_skipped_by_every_layer() {
    let hierarchy = chain(2);
    let bind = pose(0, 2);
    let mut skeleton = Skeleton::new(hierarchy, bind.clone()).unwrap();
    let good = Clip::new("good", 2, vec![pose(1, 2)]).unwrap();
    let empty = good.truncated(0);

    skeleton.apply_clip(&empty, 0);
    skeleton.blend_layer(&good, 0, &empty, 0, 0.5, LayerFlags::USE_LOCAL_POSE);
    skeleton.override_layer(&empty, 0, 1.0, LayerFlags::empty(), None);
    skeleton.additive_layer(&empty, 0, &bind, 1.0, LayerFlags::empty(), None);
    assert_eq!(skeleton.pose(), &bind);
}

fn disc_clips() -> DiscClips {
    let clip = |name: &str, x: f32, z: f32| {
        let frame = Pose::from_transforms(vec![Transform::from_translation(Vec3::new(x, 0.0, z))]);
        Arc::new(Clip::new(name, 1, vec![frame; 8]).unwrap())
    };
    DiscClips {
        idle: clip("idle", 0.0, 0.0),
        up: clip("up", 0.0, 1.0),
        down: clip("down", 0.0, -1.0),
        left: clip("left", -1.0, 0.0),
        right: clip("right", 1.0, 0.0),
    }
}

#[test]
fn test_disc_reversal_smoothing() {
    let mut disc = Disc::new(disc_clips(), DiscConfig::default()).unwrap();
    disc.set_lag_factor(1.0);

    disc.get_pose(1.0, 0.0, 0.0);
    disc.get_pose(-1.0, 0.0, 0.0);
    assert!(disc.lag_factor() <= 0.02);

    let mut previous = disc.lag_factor();
    let mut calls = 0;
    while previous < 1.0 {
        disc.get_pose(-1.0, 0.0, 0.0);
        assert!(disc.lag_factor() > previous);
        previous = disc.lag_factor();
        calls += 1;
        assert!(calls < 200, "lag factor never reached 1.0");
    }

    disc.get_pose(-1.0, 0.0, 0.0);
    assert_eq!(disc.lag_factor(), 1.0);
}

#[test]
fn test_two_bone_child_global_translation() {
    let hierarchy = chain(2);
    let bind = Pose::from_transforms(vec![
        Transform::IDENTITY,
        Transform::from_translation(Vec3::new(0.0, 1.0, 0.0)),
    ]);

    // Root is the identity, so local and global agree for the child
    let local = bind.to_local(&hierarchy);
    assert_eq!(local[1], Transform::from_translation(Vec3::new(0.0, 1.0, 0.0)));

    let global = local.to_global(&hierarchy);
    assert_eq!(global[1].translation, Vec3::new(0.0, 1.0, 0.0));
    assert_eq!(global, bind);

    let rest = Pose::from_transforms(vec![Transform::IDENTITY, Transform::IDENTITY]);
    assert_eq!(rest.to_global(&hierarchy)[1], Transform::IDENTITY);
}

#[test]
fn test_two_bone_masked_override() {
    let a = Pose::identity(2);
    let b = Pose::from_transforms(vec![
        Transform::from_translation(Vec3::new(1.0, 0.0, 0.0));
        2
    ]);
    let mask = BoneMask::from_weights(vec![1.0, 0.0]);

    let blended = a.override_blend(&b, 0.5, Some(&mask));
    assert_eq!(blended[0].translation, Vec3::new(0.5, 0.0, 0.0));
    assert_eq!(blended[1].translation, Vec3::new(0.0, 0.0, 0.0));
}

#[test]
fn test_upper_body_override_leaves_legs() {
    let hierarchy = Hierarchy::new(vec![
        BoneInfo::new("Hips", -1),
        BoneInfo::new("LeftLeg", 0),
        BoneInfo::new("LeftFoot", 1),
        BoneInfo::new("Spine", 0),
        BoneInfo::new("Head", 3),
    ])
    .unwrap();

    let mut lower = BoneMask::zeros(hierarchy.len());
    lower
        .mask_children_by_parent_regex(&hierarchy, "Leg", 1.0)
        .unwrap();
    lower.mask_by_regex(&hierarchy, "Leg", 1.0).unwrap();
    lower.set(0, 1.0);
    let upper = lower.inverted();

    let bind = pose(0, hierarchy.len());
    let aim = Clip::new("aim", hierarchy.len(), vec![pose(9, hierarchy.len())]).unwrap();
    let mut skeleton = Skeleton::new(hierarchy, bind.clone()).unwrap();
    skeleton.override_layer(&aim, 0, 1.0, LayerFlags::USE_LOCAL_POSE, Some(&upper));

    for bone in 0..3 {
        assert!(skeleton.pose()[bone].abs_diff_eq(&bind[bone], EPS));
    }
    // Spine follows the clip in local space under an unchanged hips bone
    let local = skeleton.pose().to_local(skeleton.hierarchy());
    let aim_local = aim.frames()[0].to_local(skeleton.hierarchy());
    assert!(local[3].abs_diff_eq(&aim_local[3], EPS));
    assert!(local[4].abs_diff_eq(&aim_local[4], EPS));
}
