use criterion::{black_box, criterion_group, criterion_main, Criterion};
use folio_codec::{export_string, import_tree};

fn build_document(blocks: usize) -> String {
    let mut children = Vec::with_capacity(blocks);
    for i in 0..blocks {
        children.push(match i % 3 {
            0 => format!(
                r#"{{"type":"paragraph","version":1,"children":[{{"type":"text","version":1,"text":"Paragraph {i}","format":{}}}]}}"#,
                i % 32
            ),
            1 => format!(
                r#"{{"type":"image","version":1,"src":"/img/{i}.png","altText":"","width":{},"height":"auto","showCaption":false,"caption":""}}"#,
                100 + i
            ),
            _ => r#"{"type":"list","version":1,"listType":"ordered","start":1,"children":[{"type":"listitem","version":1,"children":[{"type":"text","version":1,"text":"item","format":0}]}]}"#.to_string(),
        });
    }
    format!(r#"{{"root":{{"children":[{}]}}}}"#, children.join(","))
}

fn import_document(c: &mut Criterion) {
    let source = build_document(200);

    c.bench_function("import_200_blocks", |b| {
        b.iter(|| import_tree(black_box(&source)))
    });
}

fn export_document(c: &mut Criterion) {
    let tree = import_tree(&build_document(200));

    c.bench_function("export_200_blocks", |b| {
        b.iter(|| export_string(black_box(&tree)))
    });
}

criterion_group!(benches, import_document, export_document);
criterion_main!(benches);
