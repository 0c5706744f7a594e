use jigsaw::edges::{EdgeDir, PieceEdgeType, classify, classify_piece};
use jigsaw::joints::{JointShape, JointTopology};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn shared_seams_are_complementary_on_every_grid() {
    for rows in 1..=6u32 {
        for cols in 1..=6u32 {
            let mut rng = ChaCha8Rng::seed_from_u64((rows * 31 + cols) as u64);
            let topo = JointTopology::generate(rows, cols, &mut rng);
            for r in 0..rows {
                for c in 0..cols {
                    if c + 1 < cols {
                        let right = classify(&topo, r, c, EdgeDir::Right);
                        let left = classify(&topo, r, c + 1, EdgeDir::Left);
                        assert_ne!(right, PieceEdgeType::Flat);
                        assert_eq!(right, left.complement(), "{rows}x{cols} at ({r},{c})");
                    }
                    if r + 1 < rows {
                        let bottom = classify(&topo, r, c, EdgeDir::Bottom);
                        let top = classify(&topo, r + 1, c, EdgeDir::Top);
                        assert_ne!(bottom, PieceEdgeType::Flat);
                        assert_eq!(bottom, top.complement(), "{rows}x{cols} at ({r},{c})");
                    }
                }
            }
        }
    }
}

#[test]
fn border_edges_are_flat_whatever_the_joints() {
    for shape in [JointShape::Knob, JointShape::Indent] {
        let topo = JointTopology::uniform(3, 4, shape);
        for c in 0..4 {
            assert_eq!(classify(&topo, 0, c, EdgeDir::Top), PieceEdgeType::Flat);
            assert_eq!(classify(&topo, 2, c, EdgeDir::Bottom), PieceEdgeType::Flat);
        }
        for r in 0..3 {
            assert_eq!(classify(&topo, r, 0, EdgeDir::Left), PieceEdgeType::Flat);
            assert_eq!(classify(&topo, r, 3, EdgeDir::Right), PieceEdgeType::Flat);
        }
        // The interior piece has no flat edge at all.
        let inner = classify_piece(&topo, 1, 1);
        assert!(inner.iter().all(|(_, kind)| kind != PieceEdgeType::Flat));
    }
}

#[test]
fn explicit_joints_drive_polarity() {
    // 2x2: seam right of (0,0) is a knob, seam right of (1,0) an indent,
    // seam below (0,0) an indent, seam below (0,1) a knob.
    let topo = JointTopology::from_parts(
        2,
        2,
        vec![JointShape::Knob, JointShape::Indent],
        vec![JointShape::Indent, JointShape::Knob],
    )
    .expect("matrix sizes match a 2x2 grid");

    assert_eq!(classify(&topo, 0, 0, EdgeDir::Right), PieceEdgeType::Knob);
    assert_eq!(classify(&topo, 0, 1, EdgeDir::Left), PieceEdgeType::Indent);
    assert_eq!(classify(&topo, 1, 0, EdgeDir::Right), PieceEdgeType::Indent);
    assert_eq!(classify(&topo, 1, 1, EdgeDir::Left), PieceEdgeType::Knob);
    assert_eq!(classify(&topo, 0, 0, EdgeDir::Bottom), PieceEdgeType::Indent);
    assert_eq!(classify(&topo, 1, 0, EdgeDir::Top), PieceEdgeType::Knob);
    assert_eq!(classify(&topo, 0, 1, EdgeDir::Bottom), PieceEdgeType::Knob);
    assert_eq!(classify(&topo, 1, 1, EdgeDir::Top), PieceEdgeType::Indent);
}
