use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use nori_common::{Image, Rating, SearchResult, Tag, TagType};
use nori_core::TagFilter;
use rand::{
    distributions::{Alphanumeric, DistString},
    seq::SliceRandom,
    thread_rng, Rng,
};

const TAGS: [&str; 27] = [
    "dog",
    "cat",
    "anthro",
    "gore",
    "male",
    "female",
    "skadi_(arknights)",
    "colored_nails",
    "claws",
    "abs",
    "shirt",
    "sex",
    "tall",
    "abstract",
    "pokemon",
    "human",
    "wolf",
    "fox",
    "cervid",
    "deer",
    "whale",
    "helicopter",
    "sword",
    "gun",
    "blood",
    "painting",
    "breasts",
];

const EXTENSIONS: [&str; 5] = ["webm", "jpg", "png", "webp", "avif"];

fn seed_data(num: u64) -> (SearchResult, TagFilter) {
    let mut rng = thread_rng();

    let rnum = rng.gen_range(1..=27);
    let filter_pref: Vec<&str> = TAGS.choose_multiple(&mut rng, rnum).copied().collect();
    let filter = TagFilter::from_preference(&filter_pref.join(" "));

    let mut images = Vec::with_capacity(num as usize);

    for _i in 0..num {
        let rn = rng.gen_range(0..=27);
        let md5 = Alphanumeric.sample_string(&mut rng, 32);
        let ext = EXTENSIONS.choose(&mut rng).unwrap();

        images.push(Image {
            id: rng.gen_range(1..u64::MAX).to_string(),
            file_url: format!("https://example.com/{md5}.{ext}"),
            md5: Some(md5),
            rating: *Rating::ALL.choose(&mut rng).unwrap(),
            tags: TAGS
                .choose_multiple(&mut rng, rn)
                .map(|t| Tag::new(t, TagType::General))
                .collect(),
            ..Default::default()
        });
    }

    (SearchResult::new(images, vec![], 0), filter)
}

fn filter(mut result: SearchResult, filter: &TagFilter) -> usize {
    filter.apply(&mut result) + result.filter_ratings(&[Rating::Safe, Rating::Questionable])
}

fn result_filter_bench(c: &mut Criterion) {
    for size in [20, 100, 1000, 10000] {
        c.bench_function(&format!("Filter {size} Images"), |b| {
            b.iter_batched(
                || seed_data(size),
                |(result, tags)| filter(black_box(result), &tags),
                BatchSize::SmallInput,
            )
        });
    }
}

criterion_group!(benches, result_filter_bench);
criterion_main!(benches);
