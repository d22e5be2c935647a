//! Two-locale label table.

use venus_gecko_core::{Gender, Language, SortOption, Status};

/// Every user-facing label in one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translation {
    pub title: &'static str,
    pub for_sale: &'static str,
    pub parents: &'static str,
    pub sold_out: &'static str,
    pub admin_mode: &'static str,
    pub add_gecko: &'static str,
    pub manage_morphs: &'static str,
    pub set_as_main: &'static str,
    pub edit: &'static str,
    pub delete: &'static str,
    pub morph: &'static str,
    pub gender: &'static str,
    pub hatch_date: &'static str,
    pub price: &'static str,
    pub sire: &'static str,
    pub dam: &'static str,
    pub status: &'static str,
    pub all: &'static str,
    pub filter_by: &'static str,
    pub male: &'static str,
    pub female: &'static str,
    pub unsexed: &'static str,
    pub unknown: &'static str,
    pub save: &'static str,
    pub cancel: &'static str,
    pub available: &'static str,
    pub sold: &'static str,
    pub breeder: &'static str,
    pub view_details: &'static str,
    pub back: &'static str,
    pub address: &'static str,
    pub get_directions: &'static str,
    pub instagram: &'static str,
    pub auction_band: &'static str,
    pub premium_band: &'static str,
    pub kakao_chat: &'static str,
    pub sort_by: &'static str,
    pub date_desc: &'static str,
    pub date_asc: &'static str,
    pub price_desc: &'static str,
    pub price_asc: &'static str,
    pub unsorted: &'static str,
    pub quick_jump: &'static str,
    /// Shown by the language toggle: the name of the *other* language.
    pub switch_language: &'static str,
    pub empty_catalog: &'static str,
    pub login_required: &'static str,
    pub select_morph: &'static str,
    pub morph_names_required: &'static str,
    pub save_in_progress: &'static str,
    pub landing_updated: &'static str,
    pub confirm_delete_morph: &'static str,
    pub not_for_sale: &'static str,
}

pub const KO: Translation = Translation {
    title: "베누스 게코",
    for_sale: "분양중",
    parents: "브리더",
    sold_out: "분양완료",
    admin_mode: "관리자 모드",
    add_gecko: "개체 등록",
    manage_morphs: "모프 관리",
    set_as_main: "메인 이미지로 설정",
    edit: "수정",
    delete: "삭제",
    morph: "모프",
    gender: "성별",
    hatch_date: "해칭일",
    price: "가격",
    sire: "부 (Sire)",
    dam: "모 (Dam)",
    status: "상태",
    all: "전체",
    filter_by: "필터",
    male: "수컷",
    female: "암컷",
    unsexed: "미구분",
    unknown: "알 수 없음",
    save: "저장",
    cancel: "취소",
    available: "분양가능",
    sold: "분양완료",
    breeder: "브리더",
    view_details: "상세보기",
    back: "뒤로",
    address: "주소",
    get_directions: "길찾기",
    instagram: "인스타그램",
    auction_band: "경매 밴드",
    premium_band: "프리미엄 밴드",
    kakao_chat: "카카오톡 문의",
    sort_by: "정렬",
    date_desc: "최신 해칭순",
    date_asc: "오래된 해칭순",
    price_desc: "높은 가격순",
    price_asc: "낮은 가격순",
    unsorted: "기본순",
    quick_jump: "바로가기",
    switch_language: "English",
    empty_catalog: "등록된 개체가 없습니다.",
    login_required: "관리자 로그인이 필요합니다.",
    select_morph: "모프를 선택해주세요.",
    morph_names_required: "한글/영문 모프명을 모두 입력해주세요.",
    save_in_progress: "저장 중입니다.",
    landing_updated: "메인 이미지가 변경되었습니다.",
    confirm_delete_morph: "모프를 삭제하시겠습니까? (이 모프를 사용하는 개체들의 표시가 부정확해질 수 있습니다.)",
    not_for_sale: "NFS",
};

pub const EN: Translation = Translation {
    title: "Venus Gecko",
    for_sale: "For Sale",
    parents: "Parents",
    sold_out: "Sold Out",
    admin_mode: "Admin Mode",
    add_gecko: "Add Gecko",
    manage_morphs: "Manage Morphs",
    set_as_main: "Set as Main Image",
    edit: "Edit",
    delete: "Delete",
    morph: "Morph",
    gender: "Gender",
    hatch_date: "Hatch Date",
    price: "Price",
    sire: "Sire",
    dam: "Dam",
    status: "Status",
    all: "All",
    filter_by: "Filter by",
    male: "Male",
    female: "Female",
    unsexed: "Unsexed",
    unknown: "Unknown",
    save: "Save",
    cancel: "Cancel",
    available: "Available",
    sold: "Sold",
    breeder: "Breeder",
    view_details: "View Details",
    back: "Back",
    address: "Address",
    get_directions: "Get Directions",
    instagram: "Instagram",
    auction_band: "Auction Band",
    premium_band: "Premium Band",
    kakao_chat: "KakaoTalk Chat",
    sort_by: "Sort by",
    date_desc: "Newest Hatch",
    date_asc: "Oldest Hatch",
    price_desc: "Price: High to Low",
    price_asc: "Price: Low to High",
    unsorted: "Default",
    quick_jump: "Quick Jump",
    switch_language: "한국어",
    empty_catalog: "No geckos listed yet.",
    login_required: "Admin sign-in required.",
    select_morph: "Please select a morph.",
    morph_names_required: "Enter both the Korean and English morph names.",
    save_in_progress: "A save is already in progress.",
    landing_updated: "Main image updated.",
    confirm_delete_morph: "Delete this morph? Geckos using it may display an outdated name.",
    not_for_sale: "NFS",
};

/// The table for `language`.
#[must_use]
pub const fn translations(language: Language) -> &'static Translation {
    match language {
        Language::Ko => &KO,
        Language::En => &EN,
    }
}

impl Translation {
    /// Header tab label for a status partition.
    #[must_use]
    pub const fn tab(&self, status: Status) -> &'static str {
        match status {
            Status::Available => self.for_sale,
            Status::Sold => self.sold_out,
            Status::Breeder => self.parents,
        }
    }

    /// Status picker label.
    #[must_use]
    pub const fn status(&self, status: Status) -> &'static str {
        match status {
            Status::Available => self.available,
            Status::Sold => self.sold,
            Status::Breeder => self.breeder,
        }
    }

    /// Gender label; `Unknown` reads as "unsexed".
    #[must_use]
    pub const fn gender(&self, gender: Gender) -> &'static str {
        match gender {
            Gender::Male => self.male,
            Gender::Female => self.female,
            Gender::Unknown => self.unsexed,
        }
    }

    #[must_use]
    pub const fn sort(&self, sort: SortOption) -> &'static str {
        match sort {
            SortOption::DateDesc => self.date_desc,
            SortOption::DateAsc => self.date_asc,
            SortOption::PriceDesc => self.price_desc,
            SortOption::PriceAsc => self.price_asc,
            SortOption::Unsorted => self.unsorted,
        }
    }
}
