use crate::copy_code::CopyCodeAugmenter;
use crate::lazy_images::LazyImageLoader;
use crate::links::rewrite_markdown_links_logged;
use crate::logging::PerfConsoleListener;
use crate::logging::logger::*;
use crate::logging::logging_defs::*;
use crate::models::{EnhanceOptions, EnhancedPage, PageReport};
use crate::parser::NodeRef;
use crate::sections::{ToggleController, restructure};
use crate::utils::select_descendants;
use std::rc::Rc;

fn create_perf_logger(options: &EnhanceOptions) -> PerfLogger {
    if !options.debug {
        return PerfLogger::silent();
    }
    let listeners = vec![Listener::new(Rc::new(PerfConsoleListener {
        spans: options.debug_spans.clone(),
    }))];
    PerfLogger::new(listeners)
}

/// Runs every enabled enhancement over one document, in order: restructure
/// containers, bind toggles, rewrite links, add copy buttons, observe lazy
/// images.  Binding always happens after all containers are restructured.
///
/// One perf logger serves the whole page: the controllers handed back in
/// the [`EnhancedPage`] keep reporting through it after `enhance` returns.
pub struct PageEnhancer {
    options: EnhanceOptions,
    logger: Rc<PerfLogger>,
}

impl PageEnhancer {
    pub fn new(options: EnhanceOptions) -> PageEnhancer {
        let logger = create_perf_logger(&options);
        PageEnhancer::with_perf_logger(options, logger)
    }

    pub(crate) fn with_perf_logger(options: EnhanceOptions, logger: PerfLogger) -> PageEnhancer {
        PageEnhancer {
            options,
            logger: Rc::new(logger),
        }
    }

    pub fn enhance(self, document: NodeRef) -> EnhancedPage {
        let options = self.options;
        let logger = self.logger;
        let categories = options.debug_categories;
        let mut report = PageReport::default();

        let logger_ref = &*logger;
        start_span!(logger_ref, ENHANCE);

        let mut toggles = ToggleController::with_logging(
            options.classes.clone(),
            Rc::clone(&logger),
            categories,
        );
        if options.collapse_sections {
            start_span!(logger_ref, RESTRUCTURE);
            let containers = select_descendants(&document, &options.container_selector);
            report.containers = containers.len();
            for container in &containers {
                let summary = restructure(container, &options.classes);
                d!({
                    if categories.contains(DebugLogsCategories::RESTRUCTURE_MOVES) {
                        eprintln!("restructured container: {:?}", summary);
                    }
                });
                report.toggles_created += summary.toggles_created;
            }
            end_span!(logger_ref, RESTRUCTURE);
            report.toggles_bound = toggles.attach_toggles(&document);
        }
        add_point_to_span_str!(logger_ref, ENHANCE, "sections_done");

        if options.rewrite_links {
            report.links_rewritten =
                rewrite_markdown_links_logged(&document, options.link_suffix_case, logger_ref);
            d!({
                if categories.contains(DebugLogsCategories::LINK_REWRITES) {
                    eprintln!("rewrote {} markdown links", report.links_rewritten);
                }
            });
        }

        let mut copy_buttons = CopyCodeAugmenter::with_logging(
            &options.copy_skip_class,
            Rc::clone(&logger),
            categories,
        );
        if options.add_copy_buttons {
            report.copy_buttons_added = copy_buttons.augment(&document);
        }

        let lazy_images = if options.observe_lazy_images {
            LazyImageLoader::observe_logged(
                &document,
                options.supports_intersection,
                &options.lazy_class,
                &options.deferred_src_attr,
                logger_ref,
            )
        } else {
            LazyImageLoader::disabled(&options.lazy_class, &options.deferred_src_attr)
        };
        report.lazy_images_observed = lazy_images.len();
        d!({
            if categories.contains(DebugLogsCategories::LAZY_IMAGES) && !lazy_images.is_enabled() {
                eprintln!("lazy image loading disabled");
            }
        });

        add_point_to_span_str!(logger_ref, ENHANCE, "collaborators_done");
        end_span!(logger_ref, ENHANCE);

        EnhancedPage {
            document,
            toggles,
            copy_buttons,
            lazy_images,
            report,
        }
    }
}
