use futures::channel::oneshot;
use runtime::{Renderer, RendererEvent, SubscriptionId};

/// Resolves once the renderer's base style has loaded.
pub async fn wait_for_style(renderer: &dyn Renderer) {
    if renderer.is_style_loaded() {
        return;
    }
    let (tx, rx) = oneshot::channel();
    let mut tx = Some(tx);
    let id = renderer.subscribe(Box::new(move |event| {
        if matches!(event, RendererEvent::StyleLoaded) {
            if let Some(tx) = tx.take() {
                let _ = tx.send(());
            }
        }
    }));
    settle(renderer, id, rx).await;
}

/// Resolves once `source_id` reports itself fully loaded.
///
/// Driven by the renderer's source-data events; nothing is polled. There is
/// no timeout: a source that never loads keeps the caller waiting.
pub async fn wait_for_source(renderer: &dyn Renderer, source_id: &str) {
    if renderer.is_source_loaded(source_id) {
        return;
    }
    let (tx, rx) = oneshot::channel();
    let mut tx = Some(tx);
    let wanted = source_id.to_string();
    let id = renderer.subscribe(Box::new(move |event| {
        if let RendererEvent::SourceData {
            source_id,
            is_source_loaded: true,
        } = event
        {
            if *source_id == wanted {
                if let Some(tx) = tx.take() {
                    let _ = tx.send(());
                }
            }
        }
    }));
    settle(renderer, id, rx).await;
}

async fn settle(renderer: &dyn Renderer, id: SubscriptionId, rx: oneshot::Receiver<()>) {
    if rx.await.is_err() {
        // Handler dropped without firing (renderer torn down): the event
        // will never come.
        futures::future::pending::<()>().await;
    }
    renderer.unsubscribe(id);
}

#[cfg(test)]
mod tests {
    use super::{wait_for_source, wait_for_style};
    use futures::executor::{LocalPool, block_on};
    use futures::task::LocalSpawnExt;
    use runtime::{MemoryRenderer, Renderer, RendererEvent};
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn loaded_style_returns_immediately() {
        let renderer = MemoryRenderer::loaded();
        block_on(wait_for_style(&renderer));
        assert_eq!(renderer.subscriber_count(), 0);
    }

    #[test]
    fn style_wait_resumes_on_event() {
        let renderer = Rc::new(MemoryRenderer::new());
        let done = Rc::new(Cell::new(false));
        let mut pool = LocalPool::new();
        {
            let renderer = renderer.clone();
            let done = done.clone();
            pool.spawner()
                .spawn_local(async move {
                    wait_for_style(&*renderer).await;
                    done.set(true);
                })
                .expect("spawn");
        }

        pool.run_until_stalled();
        assert!(!done.get());
        assert_eq!(renderer.subscriber_count(), 1);

        renderer.finish_style_load();
        pool.run_until_stalled();
        assert!(done.get());
        assert_eq!(renderer.subscriber_count(), 0);
    }

    #[test]
    fn source_wait_ignores_other_sources_and_partial_loads() {
        let renderer = Rc::new(MemoryRenderer::loaded());
        let done = Rc::new(Cell::new(false));
        let mut pool = LocalPool::new();
        {
            let renderer = renderer.clone();
            let done = done.clone();
            pool.spawner()
                .spawn_local(async move {
                    wait_for_source(&*renderer, "ref").await;
                    done.set(true);
                })
                .expect("spawn");
        }

        pool.run_until_stalled();
        renderer.finish_source_load("esri-sat");
        renderer.emit(&RendererEvent::SourceData {
            source_id: "ref".to_string(),
            is_source_loaded: false,
        });
        pool.run_until_stalled();
        assert!(!done.get());

        renderer.finish_source_load("ref");
        pool.run_until_stalled();
        assert!(done.get());
        assert!(renderer.is_source_loaded("ref"));
    }
}
