use glam::vec2;

use yacast_rs::{
    demo,
    renderer::{
        RenderConfig, RenderError, Software, Sprite,
        software::walls::{HitList, Ray},
    },
    world::{Atlas, Camera, Collider, CubeFace, GridMap, Texture, Tile, World},
};

const BLUE: [u8; 4] = [0, 0, 200, 255];
const GREEN: [u8; 4] = [0, 200, 0, 255];
const RED: [u8; 4] = [255, 0, 0, 255];
const YELLOW: [u8; 4] = [200, 200, 0, 255];
const SKY: [u8; 4] = [90, 90, 90, 255];

/// Wall 1 blue, floor 2 green, wall 3 yellow, sprite 9 red, grey sky.
fn atlas() -> Atlas {
    let mut atlas = Atlas::default();
    atlas.insert(1, Texture::filled(8, 8, BLUE));
    atlas.insert(2, Texture::filled(8, 8, GREEN));
    atlas.insert(3, Texture::filled(8, 8, YELLOW));
    atlas.insert(9, Texture::filled(8, 8, RED));
    for face in CubeFace::ALL {
        atlas.set_sky(face, Texture::filled(4, 4, SKY));
    }
    atlas
}

fn hall() -> GridMap {
    GridMap::parse(
        "111111111111\n\
         100000000001\n\
         100000000001\n\
         100000000001\n\
         111111111111",
        2,
    )
    .unwrap()
    .with_atlas(atlas())
}

fn hall_camera() -> Camera {
    Camera::with_fov(vec2(1.5, 2.5), vec2(1.0, 0.0), 2.0 * 0.66f32.atan(), 64)
}

/// Hall with a cut-off blue block across `x = 3` (red ceiling) in front of a
/// yellow wall at `x = 6`. From the hall camera the block's face is 1.5 away
/// and spans rows 11..53 of column 32; the yellow wall is 4.5 away and spans
/// rows 25..39.
fn ledge(cut_off: i16) -> GridMap {
    let mut map = hall();
    map.edit_rect(6, 1, 6, 3, |t| *t = Tile::wall(3));
    map.edit_rect(3, 1, 3, 3, |t| {
        t.wall = 1;
        t.cut_off = cut_off;
        t.ceil = 9;
    });
    map
}

fn assert_depth(sw: &Software, x: usize, y: usize, expected: f32) {
    let d = sw.depth_at(x, y);
    assert!((d - expected).abs() < 1e-3, "depth {d} at {x},{y}, expected {expected}");
}

fn assert_fully_drawn(sw: &Software) {
    for y in 0..sw.height() {
        for x in 0..sw.width() {
            assert!(sw.depth_at(x, y) < f32::MAX, "pixel {x},{y} left at clear depth");
        }
    }
}

fn renderer(world: &dyn World) -> Software {
    let mut sw = Software::new(64, 64, RenderConfig::default()).unwrap();
    sw.initialize(world).unwrap();
    sw
}

#[test]
fn symmetric_room() {
    let mut map = GridMap::parse("1111\n1001\n1001\n1111", 2).unwrap();
    // texture varies by row only, so mirrored columns must match exactly
    let mut rows = Texture::filled(8, 8, BLUE);
    for y in 0..8 {
        for x in 0..8 {
            rows.set_pixel(x, y, [30 * y as u8, 0, 100, 255]);
        }
    }
    let mut atlas = atlas();
    atlas.insert(1, rows);
    map = map.with_atlas(atlas);

    let camera = Camera::new(vec2(2.0, 2.0), vec2(-1.0, 0.0), vec2(0.0, 0.66), 64);
    let mut sw = renderer(&map);
    sw.render(&camera, &map).unwrap();

    let fb = sw.frame();
    for x in 1..32 {
        for y in 0..64 {
            assert_eq!(fb.pixel(x, y), fb.pixel(64 - x, y), "column {x}, row {y}");
        }
    }

    // the same wall texel columns, mirrored about the centre
    let mut hits = HitList::new();
    for x in 1..32 {
        let mut tex_x = [0i32; 2];
        for (i, col) in [x, 64 - x].into_iter().enumerate() {
            let camera_x = 2.0 * col as f32 / 64.0 - 1.0;
            let ray = Ray::new(camera.pos(), camera.ray_dir(camera_x));
            ray.march(&map, sw.bank(), sw.config(), &mut hits);
            let d = ray.perp_distance(&hits[0]);
            assert!((d - 1.0).abs() < 1e-6);
            tex_x[i] = ray.tex_x(&hits[0], ray.wall_x(&hits[0], d), 64);
        }
        assert!((tex_x[0] + tex_x[1] - 63).abs() <= 1, "column {x}: {tex_x:?}");
    }
}

#[test]
fn sprite_in_front_is_drawn() {
    let map = hall();
    let mut sw = renderer(&map);
    sw.add_sprite(Sprite::new(vec2(5.5, 2.5), 9));
    sw.render(&hall_camera(), &map).unwrap();

    let px = sw.frame().pixel(32, 32).unwrap();
    assert!(px[0] > 0 && px[1] == 0 && px[2] == 0, "{px:?}");
    assert!((sw.depth_at(32, 32) - 4.0).abs() < 1e-4);
    assert!((sw.column_distances()[32] - 9.5).abs() < 1e-4);
}

#[test]
fn sprite_behind_wall_is_hidden() {
    let mut map = hall();
    map.edit_rect(3, 1, 3, 3, |t| *t = Tile::wall(1));
    let mut sw = renderer(&map);
    sw.add_sprite(Sprite::new(vec2(5.5, 2.5), 9));
    sw.render(&hall_camera(), &map).unwrap();

    let px = sw.frame().pixel(32, 32).unwrap();
    assert_eq!(px, BLUE);
    assert!((sw.column_distances()[32] - 1.5).abs() < 1e-4);
    for y in 0..64 {
        for x in 0..64 {
            let p = sw.frame().pixel(x, y).unwrap();
            assert!(p[0] == 0 || p == [90, 90, 90, 255], "red leaked at {x},{y}");
        }
    }
}

#[test]
fn emissive_sprite_ignores_fog() {
    let map = hall();
    let far = vec2(10.5, 2.5);

    let mut plain = renderer(&map);
    plain.add_sprite(Sprite::new(far, 9));
    plain.render(&hall_camera(), &map).unwrap();

    let mut lit = renderer(&map);
    lit.add_sprite(Sprite::new(far, 9).emissive());
    lit.render(&hall_camera(), &map).unwrap();

    let dim = plain.frame().pixel(32, 32).unwrap();
    let bright = lit.frame().pixel(32, 32).unwrap();
    assert_eq!(bright, RED);
    assert!(dim[0] < 100 && dim[0] > 0, "{dim:?}");
}

#[test]
fn nearer_sprite_wins_regardless_of_order() {
    let map = hall();
    let mut sw = renderer(&map);
    sw.add_sprite(Sprite::new(vec2(4.5, 2.5), 9).emissive());
    sw.add_sprite(Sprite::new(vec2(8.5, 2.5), 1).emissive());
    sw.render(&hall_camera(), &map).unwrap();
    assert_eq!(sw.frame().pixel(32, 32), Some(RED));
    assert!((sw.depth_at(32, 32) - 3.0).abs() < 1e-4);
}

#[test]
fn demo_frame_depths_are_consistent() {
    let map = demo::map(Atlas::procedural());
    let mut camera = demo::camera(144);
    let mut sw = Software::new(160, 144, RenderConfig::default()).unwrap();
    sw.initialize(&map).unwrap();
    for s in demo::sprites() {
        sw.add_sprite(s);
    }

    for step in 0..8 {
        sw.render(&camera, &map).unwrap();
        let fb = sw.frame();
        for y in 0..144 {
            for x in 0..160 {
                let d = sw.depth_at(x, y);
                assert!(d > 0.0, "step {step}: depth {d} at {x},{y}");
                if d < f32::MAX {
                    assert_eq!(fb.pixel(x, y).unwrap()[3], 255);
                }
            }
        }
        camera.rotate(0.8);
        camera.look(if step % 2 == 0 { 1.0 } else { -2.0 });
    }
}

#[test]
fn rendering_is_deterministic() {
    let map = demo::map(Atlas::procedural());
    let camera = demo::camera(72);
    let mut a = Software::new(80, 72, RenderConfig::default()).unwrap();
    let mut b = Software::new(80, 72, RenderConfig::default()).unwrap();
    a.initialize(&map).unwrap();
    b.initialize(&map).unwrap();
    a.render(&camera, &map).unwrap();
    a.render(&camera, &map).unwrap();
    b.render(&camera, &map).unwrap();
    assert_eq!(a.frame(), b.frame());
}

#[test]
fn initialization_errors() {
    let map = hall();
    let mut sw = Software::new(8, 8, RenderConfig::default()).unwrap();
    assert!(matches!(
        sw.render(&hall_camera(), &map),
        Err(RenderError::NotInitialized)
    ));
    sw.initialize(&map).unwrap();
    assert!(matches!(
        sw.initialize(&map),
        Err(RenderError::AlreadyInitialized)
    ));
    assert!(sw.render(&hall_camera(), &map).is_ok());
}

#[test]
fn walking_west_stops_at_the_gate() {
    let map = demo::map(Atlas::procedural());
    let mut camera = demo::camera(144);
    let collider = Some(Collider {
        world: &map,
        radius: 0.2,
    });
    let mut moved = 0;
    for _ in 0..400 {
        if camera.move_forward(0.05, collider) {
            moved += 1;
        }
        let p = camera.pos();
        let tile = map.tile(p.x.floor() as i32, p.y.floor() as i32).unwrap();
        assert!(!tile.is_solid(), "inside a wall at {p:?}");
    }
    // the see-through gate at x = 12 still blocks
    let p = camera.pos();
    assert!(moved > 150 && moved < 400);
    assert!(p.x > 13.19 && p.x < 13.26, "{p:?}");
    assert_eq!(p.y, 11.5);
}

#[test]
fn horizon_row_is_filled_on_long_views() {
    let map = GridMap::new(300, 3, Tile::open(2, 0)).with_atlas(atlas());
    let camera = Camera::with_fov(vec2(1.5, 1.5), vec2(1.0, 0.0), 2.0 * 0.66f32.atan(), 64);
    let mut sw = renderer(&map);
    sw.render(&camera, &map).unwrap();

    assert_fully_drawn(&sw);
    assert_eq!(sw.frame().pixel(32, 32), Some(SKY));
    assert!(sw.column_distances()[32].is_infinite());
}

#[test]
fn block_cut_from_the_top_shows_the_wall_behind() {
    let map = ledge(48);
    let mut sw = renderer(&map);
    sw.render(&hall_camera(), &map).unwrap();

    // only the bottom quarter of the block face remains
    assert_eq!(sw.frame().pixel(32, 47), Some(BLUE));
    assert_depth(&sw, 32, 47, 1.5);
    assert_depth(&sw, 32, 30, 4.5);
    assert_ne!(sw.frame().pixel(32, 30), Some(BLUE));
    // the block's raised floor covers the base of the yellow wall
    assert_depth(&sw, 32, 40, 2.0);
    assert_eq!(sw.frame().pixel(32, 40), Some(GREEN));
    assert_fully_drawn(&sw);
}

#[test]
fn block_cut_from_the_bottom_hangs_from_the_ceiling() {
    let map = ledge(-48);
    let mut sw = renderer(&map);
    sw.render(&hall_camera(), &map).unwrap();

    // only the top quarter of the block face remains
    assert_eq!(sw.frame().pixel(32, 15), Some(BLUE));
    assert_depth(&sw, 32, 15, 1.5);
    assert_depth(&sw, 32, 35, 4.5);
    // the floor under the block is visible
    assert_depth(&sw, 32, 47, 64.0 / 30.0);
    assert_eq!(sw.frame().pixel(32, 47), Some(GREEN));
    // the lowered ceiling sits under the block face
    assert_depth(&sw, 32, 24, 2.0);
    assert_eq!(sw.frame().pixel(32, 24), Some(RED));
    assert_fully_drawn(&sw);
}

#[test]
fn looking_up_moves_the_wall_band_down() {
    let map = hall();
    let mut camera = hall_camera();
    let mut sw = renderer(&map);
    sw.render(&camera, &map).unwrap();
    let level = sw.frame().clone();
    let level_depth: Vec<f32> = (0..64).map(|y| sw.depth_at(32, y)).collect();

    camera.look(0.1);
    let offset = camera.draw_offset();
    assert_eq!(offset, 12);
    sw.render(&camera, &map).unwrap();
    assert_fully_drawn(&sw);

    let wall_rows: Vec<usize> = (0..64)
        .filter(|&y| (level_depth[y] - 9.5).abs() < 1e-3)
        .collect();
    assert_eq!(wall_rows, (29..35).collect::<Vec<_>>());
    for &y in &wall_rows {
        let shifted = y + offset as usize;
        assert_depth(&sw, 32, shifted, 9.5);
        assert_eq!(sw.frame().pixel(32, shifted), level.pixel(32, y), "row {y}");
    }
    assert!((sw.depth_at(32, 29) - 9.5).abs() > 1.0);
}

