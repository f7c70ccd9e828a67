use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaginationParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub current_page: u32,
    pub per_page: u32,
    pub total: i64,
    pub total_pages: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

impl PaginationParams {
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self { page, per_page }
    }

    pub fn get_page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn get_per_page(&self) -> u32 {
        self.per_page.unwrap_or(20).clamp(1, 100)
    }

    /// 按 u64 计算，页码很大时不会溢出
    pub fn get_offset(&self) -> u64 {
        u64::from(self.get_page() - 1) * u64::from(self.get_per_page())
    }

    pub fn get_limit(&self) -> u32 {
        self.get_per_page()
    }

    /// 对内存中已排序的完整列表分页
    pub fn paginate<T>(&self, all: Vec<T>) -> PaginatedResponse<T> {
        let total = all.len() as i64;
        // 超出末尾的页返回空列表
        let offset = usize::try_from(self.get_offset()).unwrap_or(usize::MAX);
        let items: Vec<T> = all
            .into_iter()
            .skip(offset)
            .take(self.get_limit() as usize)
            .collect();
        PaginatedResponse::new(items, self, total)
    }
}

impl PaginationInfo {
    pub fn new(current_page: u32, per_page: u32, total: i64) -> Self {
        let total_pages = if total == 0 {
            1
        } else {
            ((total as f64) / (per_page as f64)).ceil() as u32
        };

        Self {
            current_page,
            per_page,
            total,
            total_pages,
        }
    }
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, params: &PaginationParams, total: i64) -> Self {
        let pagination = PaginationInfo::new(params.get_page(), params.get_per_page(), total);

        Self { items, pagination }
    }
}
