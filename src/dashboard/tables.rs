//! The statistics box, transaction table and page links on the dashboard.

use maud::{Markup, html};
use time::{Month, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    html::{LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
    pagination::PaginationIndicator,
    statistics::Statistics,
    transaction::Transaction,
};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[day] [month repr:short] [year]");

/// Renders the sale totals for `month`.
pub(super) fn statistics_box(month: Month, statistics: &Statistics) -> Markup {
    let stat_row = |label: &str, value: String| {
        html! {
            div class="flex justify-between gap-8 py-1"
            {
                dt class="text-gray-600 dark:text-gray-400" { (label) }
                dd class="font-semibold" data-statistic=(label) { (value) }
            }
        }
    };

    html! {
        section
            id="statistics"
            class="w-full sm:w-auto mb-4 p-4 rounded-lg shadow bg-white dark:bg-gray-800"
        {
            h3 class="text-xl font-semibold mb-2" { "Statistics - " (month) }

            dl
            {
                (stat_row("Total sale", format_currency(statistics.total_sale)))
                (stat_row("Total sold items", statistics.sold_count.to_string()))
                (stat_row("Total not sold items", statistics.not_sold_count.to_string()))
            }
        }
    }
}

/// Renders one page of transactions.
pub(super) fn transactions_table(transactions: &[Transaction]) -> Markup {
    html! {
        div class="w-full overflow-x-auto rounded-lg shadow"
        {
            table id="transactions" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        @for heading in ["ID", "Title", "Description", "Price", "Category", "Date of Sale", "Sold"] {
                            th scope="col" class=(TABLE_CELL_STYLE) { (heading) }
                        }
                    }
                }

                tbody
                {
                    @for transaction in transactions {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (transaction.id) }
                            td class={(TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white"}
                            {
                                (transaction.title)
                            }
                            td class={(TABLE_CELL_STYLE) " max-w-md"} { (transaction.description) }
                            td class={(TABLE_CELL_STYLE) " text-right whitespace-nowrap"}
                            {
                                (format_currency(transaction.price))
                            }
                            td class=(TABLE_CELL_STYLE) { (transaction.category) }
                            td class={(TABLE_CELL_STYLE) " whitespace-nowrap"}
                            {
                                (format_date(transaction))
                            }
                            td class=(TABLE_CELL_STYLE) { @if transaction.sold { "Yes" } @else { "No" } }
                        }
                    }

                    @if transactions.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td colspan="7" class={(TABLE_CELL_STYLE) " text-center"}
                            {
                                "No transactions found"
                            }
                        }
                    }
                }
            }
        }
    }
}

fn format_date(transaction: &Transaction) -> String {
    transaction
        .date_of_sale
        .format(DATE_FORMAT)
        .unwrap_or_else(|_| transaction.date_of_sale.to_string())
}

/// Renders the page links under the table.
///
/// `page_url` maps a page number to the URL for that page.
pub(super) fn pagination_nav(
    indicators: &[PaginationIndicator],
    page_url: impl Fn(u64) -> String,
) -> Markup {
    html! {
        nav class="pagination mt-4" aria-label="Transaction pages"
        {
            ul class="flex flex-wrap items-center gap-2 text-sm"
            {
                @for indicator in indicators {
                    li
                    {
                        @match indicator {
                            PaginationIndicator::Page(page) => {
                                a href=(page_url(*page)) class=(LINK_STYLE) { (page) }
                            }
                            PaginationIndicator::CurrPage(page) => {
                                span aria-current="page" class="font-bold" { (page) }
                            }
                            PaginationIndicator::Ellipsis => {
                                span { "..." }
                            }
                            PaginationIndicator::BackButton(page) => {
                                a href=(page_url(*page)) class=(LINK_STYLE) { "Previous" }
                            }
                            PaginationIndicator::NextButton(page) => {
                                a href=(page_url(*page)) class=(LINK_STYLE) { "Next" }
                            }
                        }
                    }
                }
            }
        }
    }
}
