use pdfgrid::charwise::CharwiseExt;
use pdfgrid::grid::{Block, Page};

/// xorshift so the pages are the same on every run
struct Rng(u64);

impl Rng {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    fn below(&mut self, bound: u64) -> f64 {
        (self.next() % bound) as f64
    }
}

const WORDS: &[&str] = &["lorem", "ipsum", "dolor", "sit", "amet", "ünïcödé", "日本語"];

fn random_page(seed: u64, blocks: usize) -> Page {
    let mut rng = Rng(seed);
    let mut page = Page::new(612.0, 792.0);

    for _ in 0..blocks {
        let left = rng.below(500);
        let top = rng.below(700);
        let right = left + 5.0 + rng.below(100);
        let bottom = top + 5.0 + rng.below(60);

        let lines = 1 + rng.next() % 3;
        let text: Vec<String> = (0..lines)
            .map(|_| {
                let words = 1 + rng.next() % 4;
                (0..words)
                    .map(|_| WORDS[(rng.next() % WORDS.len() as u64) as usize])
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();

        page.add(Block::new(left, right, top, bottom, text.join("\n")));
    }

    page.generate_grid();
    page
}

fn rectangles(page: &Page) -> Vec<(usize, usize, usize, usize)> {
    page.blocks()
        .iter()
        .zip(page.block_offsets())
        .map(|(block, offset)| (offset.x, offset.y, offset.x + block.width(), offset.y + block.height()))
        .collect()
}

#[test]
fn placed_blocks_never_intersect() {
    for seed in 1..=20u64 {
        let page = random_page(seed.wrapping_mul(0x2545_f491_4f6c_dd1d), 30);
        let rects = rectangles(&page);

        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                let disjoint = a.2 <= b.0 || b.2 <= a.0 || a.3 <= b.1 || b.3 <= a.1;
                assert!(disjoint, "seed {seed}: {a:?} intersects {b:?}");
            }
        }
    }
}

#[test]
fn every_block_is_fully_visible_in_the_grid() {
    let page = random_page(0xdead_beef, 25);

    for (block, offset) in page.blocks().iter().zip(page.block_offsets()) {
        for (dy, line) in block.text().split('\n').enumerate() {
            let row: String = page.grid()[offset.y + dy][offset.x..offset.x + line.unit_len()]
                .iter()
                .collect();
            assert_eq!(row, line);
        }
    }
}

#[test]
fn block_width_is_longest_line_in_units() {
    let page = random_page(42, 40);
    for block in page.blocks() {
        let longest = block.text().split('\n').map(str::unit_len).max().unwrap_or(0);
        assert_eq!(block.width(), longest);
    }
}

#[test]
fn page_search_is_sorted_and_visually_distinct() {
    let page = random_page(7, 40);
    let needle = "sit";
    let results = page.search(needle);
    assert!(!results.is_empty());

    for pair in results.windows(2) {
        assert!(pair[0].grid_cmp(&pair[1]).is_le());
    }
    for (i, a) in results.iter().enumerate() {
        for b in &results[i + 1..] {
            assert!(a.y != b.y || a.x.abs_diff(b.x) >= needle.unit_len());
        }
    }
}

#[test]
fn search_hits_point_at_the_needle_in_the_grid() {
    let page = random_page(99, 30);
    for hit in page.search("ipsum") {
        let cells: String = page.grid()[hit.y][hit.x..hit.x + 5].iter().collect();
        assert_eq!(cells, "ipsum");
    }
}

#[test]
fn empty_needle_finds_nothing_anywhere() {
    let page = random_page(3, 10);
    assert!(page.search("").is_empty());
    assert!(page.blocks().iter().all(|b| b.search("").is_empty()));
}

#[test]
fn hello_world_layout() {
    let mut page = Page::new(20.0, 1.0);
    page.add(Block::new(0.0, 5.0, 0.0, 1.0, "Hello"));
    page.add(Block::new(10.0, 15.0, 0.0, 1.0, "World"));
    page.generate_grid();

    let offsets: Vec<(usize, usize)> = page.block_offsets().iter().map(|o| (o.x, o.y)).collect();
    assert_eq!(offsets, vec![(0, 0), (9, 0)]);
    assert_eq!(page.width(), 14);
    assert_eq!(page.height(), 1);
}
