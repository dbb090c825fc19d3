use super::*;
use crate::foundation::core::Size;
use crate::foundation::error::RasterfitError;
use crate::layout::config::ResizeConfig;
use crate::render::surface::Surface;

#[test]
fn realizes_each_pipeline_in_input_order() {
    let mut pipelines = (1..=4u32)
        .map(|i| {
            let mut p = Pipeline::new(Surface::new(10, 10).unwrap());
            p.append_resize(ResizeConfig::fill(i, i).unwrap()).unwrap();
            p
        })
        .collect::<Vec<_>>();
    pipelines[2].realize().unwrap();

    let results = realize_batch(&mut pipelines);
    assert_eq!(results.len(), 4);
    for (i, r) in results.iter().enumerate() {
        if i == 2 {
            assert!(matches!(r, Err(RasterfitError::AlreadyRealized)));
        } else {
            let n = i as u32 + 1;
            assert_eq!(r.as_ref().unwrap().surface.size(), Size::new(n, n));
        }
    }
    assert!(pipelines.iter().all(Pipeline::is_realized));
}
