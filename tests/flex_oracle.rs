//! Flex placement cross-checked against taffy.
//!
//! Only the subset both engines agree on is compared: a single fixed-size
//! container, fixed-basis items that fit without shrinking, no wrapping.

use proptest::prelude::*;
use spark_ui::{
    AlignItems, Dimension, EngineConfig, FlexDirection, InputSnapshot, NodeFlags, Padding, Rect,
    Style, Subtree, Vec2,
};
use taffy::prelude::{TaffyMaxContent, auto, length};

#[derive(Debug, Clone, Copy)]
struct Item {
    main: f32,
    cross: Option<f32>,
    grow: f32,
}

#[derive(Debug, Clone)]
struct Case {
    direction: FlexDirection,
    size: Vec2,
    padding: f32,
    spacing: f32,
    justify: spark_ui::JustifyContent,
    align: AlignItems,
    items: Vec<Item>,
}

fn item_size(direction: FlexDirection, item: &Item) -> (Dimension, Dimension) {
    let main = Dimension::Px(item.main);
    let cross = item.cross.map_or(Dimension::Auto, Dimension::Px);
    match direction {
        FlexDirection::Row => (main, cross),
        FlexDirection::Column => (cross, main),
    }
}

/// Item rects relative to the container's outer origin.
fn spark_layout(case: &Case) -> Vec<Rect> {
    let mut subtree = Subtree::new(EngineConfig::default()).unwrap();
    let mut frame = subtree.begin_frame(Vec2::new(1000.0, 1000.0));
    let container = frame
        .container(
            NodeFlags::NONE,
            Style {
                display: spark_ui::Display::Flex,
                flex_direction: case.direction,
                justify_content: case.justify,
                align_items: case.align,
                padding: Padding::all(case.padding),
                spacing: case.spacing,
                ..Style::sized(case.size.x, case.size.y)
            },
        )
        .unwrap();
    let mut nodes = Vec::new();
    for item in &case.items {
        let (width, height) = item_size(case.direction, item);
        let n = frame
            .container(
                NodeFlags::NONE,
                Style {
                    width,
                    height,
                    flex_grow: item.grow,
                    ..Style::default()
                },
            )
            .unwrap();
        frame.end().unwrap();
        nodes.push(n);
    }
    frame.end().unwrap();
    frame.finish(&InputSnapshot::new());

    let origin = subtree.node(container).unwrap().layout.outer.pos;
    nodes
        .into_iter()
        .map(|n| {
            let outer = subtree.node(n).unwrap().layout.outer;
            Rect::from_pos_size(outer.pos - origin, outer.size)
        })
        .collect()
}

fn taffy_layout(case: &Case) -> Vec<Rect> {
    use taffy::style::{
        AlignItems as TAlign, Display, FlexDirection as TDirection, JustifyContent as TJustify,
    };

    let mut tree: taffy::TaffyTree<()> = taffy::TaffyTree::new();
    tree.disable_rounding();
    let children: Vec<_> = case
        .items
        .iter()
        .map(|item| {
            let dim = |d: Dimension| -> taffy::style::Dimension {
                match d {
                    Dimension::Px(v) => length(v),
                    _ => auto(),
                }
            };
            let (width, height) = item_size(case.direction, item);
            tree.new_leaf(taffy::Style {
                size: taffy::Size {
                    width: dim(width),
                    height: dim(height),
                },
                flex_grow: item.grow,
                flex_shrink: 0.0,
                ..Default::default()
            })
            .unwrap()
        })
        .collect();

    let root = tree
        .new_with_children(
            taffy::Style {
                display: Display::Flex,
                flex_direction: match case.direction {
                    FlexDirection::Row => TDirection::Row,
                    FlexDirection::Column => TDirection::Column,
                },
                justify_content: Some(match case.justify {
                    spark_ui::JustifyContent::Start => TJustify::Start,
                    spark_ui::JustifyContent::Center => TJustify::Center,
                    spark_ui::JustifyContent::End => TJustify::End,
                    spark_ui::JustifyContent::SpaceBetween => TJustify::SpaceBetween,
                }),
                align_items: Some(match case.align {
                    AlignItems::Start => TAlign::Start,
                    AlignItems::Center => TAlign::Center,
                    AlignItems::End => TAlign::End,
                    AlignItems::Stretch => TAlign::Stretch,
                }),
                size: taffy::Size {
                    width: length(case.size.x),
                    height: length(case.size.y),
                },
                padding: taffy::Rect {
                    left: length(case.padding),
                    right: length(case.padding),
                    top: length(case.padding),
                    bottom: length(case.padding),
                },
                gap: taffy::Size {
                    width: length(case.spacing),
                    height: length(case.spacing),
                },
                ..Default::default()
            },
            &children,
        )
        .unwrap();
    tree.compute_layout(root, taffy::Size::MAX_CONTENT).unwrap();

    children
        .iter()
        .map(|&c| {
            let l = tree.layout(c).unwrap();
            Rect::new(l.location.x, l.location.y, l.size.width, l.size.height)
        })
        .collect()
}

fn assert_same(case: &Case) {
    let ours = spark_layout(case);
    let reference = taffy_layout(case);
    assert_eq!(ours.len(), reference.len());
    for (i, (a, b)) in ours.iter().zip(&reference).enumerate() {
        let close = (a.pos.x - b.pos.x).abs() < 1e-3
            && (a.pos.y - b.pos.y).abs() < 1e-3
            && (a.size.x - b.size.x).abs() < 1e-3
            && (a.size.y - b.size.y).abs() < 1e-3;
        assert!(close, "item {i}: ours {a:?}, taffy {b:?} in {case:?}");
    }
}

fn fixed(main: f32, cross: f32) -> Item {
    Item {
        main,
        cross: Some(cross),
        grow: 0.0,
    }
}

fn case(direction: FlexDirection, items: Vec<Item>) -> Case {
    Case {
        direction,
        size: Vec2::new(300.0, 120.0),
        padding: 6.0,
        spacing: 10.0,
        justify: spark_ui::JustifyContent::Start,
        align: AlignItems::Start,
        items,
    }
}

#[test]
fn test_row_justify_variants() {
    for justify in [
        spark_ui::JustifyContent::Start,
        spark_ui::JustifyContent::Center,
        spark_ui::JustifyContent::End,
        spark_ui::JustifyContent::SpaceBetween,
    ] {
        assert_same(&Case {
            justify,
            ..case(FlexDirection::Row, vec![fixed(50.0, 20.0), fixed(80.0, 30.0), fixed(40.0, 10.0)])
        });
    }
}

#[test]
fn test_row_align_variants() {
    for align in [
        AlignItems::Start,
        AlignItems::Center,
        AlignItems::End,
        AlignItems::Stretch,
    ] {
        let items = vec![
            fixed(50.0, 20.0),
            Item {
                main: 60.0,
                cross: None,
                grow: 0.0,
            },
        ];
        let case = Case {
            align,
            ..case(FlexDirection::Row, items)
        };
        // Auto cross size only has a defined result when stretched.
        if align == AlignItems::Stretch {
            assert_same(&case);
        } else {
            let fixed_only = Case {
                items: vec![case.items[0], fixed(60.0, 44.0)],
                ..case
            };
            assert_same(&fixed_only);
        }
    }
}

#[test]
fn test_column_grow() {
    let items = vec![
        Item {
            main: 20.0,
            cross: Some(100.0),
            grow: 1.0,
        },
        Item {
            main: 10.0,
            cross: Some(100.0),
            grow: 3.0,
        },
    ];
    assert_same(&case(FlexDirection::Column, items));
}

fn item_strategy() -> impl Strategy<Value = Item> {
    (1.0f32..60.0, 1.0f32..60.0, prop_oneof![Just(0.0f32), 0.5f32..4.0]).prop_map(
        |(main, cross, grow)| Item {
            main: main.round(),
            cross: Some(cross.round()),
            grow,
        },
    )
}

proptest! {
    #[test]
    fn test_row_matches_taffy(
        items in prop::collection::vec(item_strategy(), 1..5),
        spacing in 0.0f32..12.0,
        justify in prop_oneof![
            Just(spark_ui::JustifyContent::Start),
            Just(spark_ui::JustifyContent::Center),
            Just(spark_ui::JustifyContent::End),
            Just(spark_ui::JustifyContent::SpaceBetween),
        ],
    ) {
        // 4 items of at most 60 plus gaps always fit in the 288 content width.
        let case = Case {
            spacing: spacing.round(),
            justify,
            ..case(FlexDirection::Row, items)
        };
        assert_same(&case);
    }
}
